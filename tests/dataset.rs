use std::{fs, path::Path};

use mot_insight::{
    classify::ClassificationResult,
    config::Settings,
    data::{
        ingest,
        reviews::{self, ClassifiedRow, ReviewRecord},
    },
    taxonomy::MOT_CATEGORIES,
};
use tempfile::TempDir;

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

#[test]
fn ingest_filters_joins_and_assigns_dense_indices() {
    let tmp = TempDir::new().unwrap();
    let settings = test_settings(tmp.path());
    let reviews_path = tmp.path().join("reviews.json");
    let meta_path = tmp.path().join("meta.json");
    fs::write(
        &reviews_path,
        concat!(
            "{\"gmap_id\":\"g1\",\"text\":\"Great spot\"}\n",
            "{\"gmap_id\":\"g2\",\"text\":\"Not ours\"}\n",
            "{\"gmap_id\":\"g1\",\"text\":null}\n",
            "{\"gmap_id\":\"g1\",\"text\":\"Slow service\"}\n",
        ),
    )
    .unwrap();
    fs::write(
        &meta_path,
        concat!(
            "{\"gmap_id\":\"g1\",\"name\":\"Mezzaluna\"}\n",
            "{\"gmap_id\":\"g3\",\"name\":\"Elsewhere\"}\n",
        ),
    )
    .unwrap();

    let count =
        ingest::extract_reviews(&reviews_path, &meta_path, &["g1".to_string()], &settings).unwrap();
    assert_eq!(count, 2);

    let rows = reviews::load_reviews(&settings).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].index, 0);
    assert_eq!(rows[0].text, "Great spot");
    assert_eq!(rows[1].index, 1);
    assert_eq!(rows[1].text, "Slow service");
    assert!(rows.iter().all(|r| r.business == "Mezzaluna"));
}

#[test]
fn classified_dataset_round_trips_including_provenance() {
    let tmp = TempDir::new().unwrap();
    let settings = test_settings(tmp.path());

    let mut genuine = ClassificationResult {
        mentions: vec![false; MOT_CATEGORIES.len()],
        sentiments: vec![0; MOT_CATEGORIES.len()],
        degraded: false,
    };
    genuine.mentions[2] = true;
    genuine.sentiments[2] = 3;
    let rows = vec![
        ClassifiedRow {
            review: ReviewRecord {
                index: 0,
                business: "Mezzaluna".to_string(),
                text: "Nice".to_string(),
            },
            result: genuine.clone(),
        },
        ClassifiedRow {
            review: ReviewRecord {
                index: 1,
                business: "Mezzaluna".to_string(),
                text: String::new(),
            },
            result: ClassificationResult::degraded_default(),
        },
    ];
    reviews::write_classified(&rows, &settings).unwrap();

    let loaded = reviews::load_classified(&settings).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].result, genuine);
    assert!(loaded[1].result.degraded);
    assert_eq!(loaded.iter().filter(|r| r.result.degraded).count(), 1);
}
