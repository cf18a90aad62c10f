use std::{path::Path, sync::Mutex};

use anyhow::Result;
use async_trait::async_trait;
use mot_insight::{
    classify::{
        client::{ChatBackend, ChatMessage},
        ClassificationResult,
    },
    cli::InsightFocus,
    config::Settings,
    data::reviews::{self, ClassifiedRow, ReviewRecord},
    insight, ranking,
    taxonomy::MOT_CATEGORIES,
};
use tempfile::TempDir;

struct EchoBackend {
    messages: Mutex<Vec<ChatMessage>>,
}

impl EchoBackend {
    fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn complete(&self, messages: Vec<ChatMessage>, _temperature: f32) -> Result<String> {
        self.messages.lock().unwrap().extend(messages);
        Ok("narrative".to_string())
    }
}

fn test_settings(root: &Path) -> Settings {
    Settings {
        openai_api_key: None,
        openai_base_url: "http://localhost".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        data_dir: root.join("data"),
        outputs_dir: root.join("outputs"),
        batch_poll_secs: 1,
        batch_timeout_secs: 5,
        retry_backoff_secs: 0,
    }
}

fn seed_rankings(settings: &Settings) {
    let mut result = ClassificationResult {
        mentions: vec![false; MOT_CATEGORIES.len()],
        sentiments: vec![0; MOT_CATEGORIES.len()],
        degraded: false,
    };
    result.mentions[0] = true;
    result.sentiments[0] = 3;
    result.mentions[1] = true;
    result.sentiments[1] = 1;
    let rows = vec![ClassifiedRow {
        review: ReviewRecord {
            index: 0,
            business: "Mezzaluna".to_string(),
            text: "Nice".to_string(),
        },
        result,
    }];
    reviews::write_classified(&rows, settings).unwrap();
    ranking::rank_all(settings).unwrap();
}

#[tokio::test]
async fn importance_insight_summarises_the_ranked_table() {
    let tmp = TempDir::new().unwrap();
    let settings = test_settings(tmp.path());
    seed_rankings(&settings);

    let backend = EchoBackend::new();
    let narrative = insight::generate(&backend, "Mezzaluna", InsightFocus::Importance, &settings)
        .await
        .unwrap();
    assert_eq!(narrative, "narrative");

    let messages = backend.messages.lock().unwrap();
    assert_eq!(messages[0].role, "system");
    assert!(messages[1].content.contains("Mezzaluna"));
    assert!(messages[1].content.contains(MOT_CATEGORIES[0]));
}

#[tokio::test]
async fn quadrant_insight_covers_every_quadrant_section() {
    let tmp = TempDir::new().unwrap();
    let settings = test_settings(tmp.path());
    seed_rankings(&settings);

    let backend = EchoBackend::new();
    insight::generate(&backend, "Mezzaluna", InsightFocus::Quadrant, &settings)
        .await
        .unwrap();

    let messages = backend.messages.lock().unwrap();
    let prompt = &messages[1].content;
    for section in ["Fix Now", "Invest Further", "Deprioritise", "Maintain"] {
        assert!(prompt.contains(section), "missing section {section}");
    }
}

#[tokio::test]
async fn insight_fails_cleanly_without_a_ranked_table() {
    let tmp = TempDir::new().unwrap();
    let settings = test_settings(tmp.path());
    let backend = EchoBackend::new();
    let err = insight::generate(&backend, "Nowhere", InsightFocus::Satisfaction, &settings)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("run rank first"));
}
