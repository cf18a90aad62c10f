use std::{fs, path::Path};

use mot_insight::{
    classify::ClassificationResult,
    config::Settings,
    data::reviews::{self, ClassifiedRow, ReviewRecord},
    ranking::{self, rank_business, RankKind},
    taxonomy::MOT_CATEGORIES,
};
use tempfile::TempDir;

fn row(index: i64, mentions: &[(usize, bool)], sentiments: &[(usize, i64)]) -> ClassifiedRow {
    let mut result = ClassificationResult {
        mentions: vec![false; MOT_CATEGORIES.len()],
        sentiments: vec![0; MOT_CATEGORIES.len()],
        degraded: false,
    };
    for &(pos, flag) in mentions {
        result.mentions[pos] = flag;
    }
    for &(pos, code) in sentiments {
        result.sentiments[pos] = code;
    }
    ClassifiedRow {
        review: ReviewRecord {
            index,
            business: "Mezzaluna".to_string(),
            text: String::new(),
        },
        result,
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

#[test]
fn satisfaction_mean_excludes_zero_sentinels() {
    let rows = vec![
        row(0, &[], &[]),
        row(1, &[], &[]),
        row(2, &[], &[(0, 3)]),
        row(3, &[], &[(0, 1)]),
    ];
    let table = rank_business(&rows);
    let sat = table
        .iter()
        .find(|r| r.kind == RankKind::Satisfaction && r.mot == MOT_CATEGORIES[0])
        .unwrap();
    assert_eq!(sat.avg_sentiment, Some(2.0));
}

#[test]
fn importance_counts_all_mentions_regardless_of_sentiment() {
    let rows = vec![
        row(0, &[(1, true)], &[]),
        row(1, &[(1, true)], &[(1, 2)]),
        row(2, &[], &[]),
        row(3, &[(1, true)], &[(1, 1)]),
    ];
    let table = rank_business(&rows);
    let imp = table
        .iter()
        .find(|r| r.kind == RankKind::Importance && r.mot == MOT_CATEGORIES[1])
        .unwrap();
    assert_eq!(imp.mentions, Some(3));
}

#[test]
fn satisfaction_mean_rounds_to_two_decimals() {
    let rows = vec![
        row(0, &[], &[(2, 1)]),
        row(1, &[], &[(2, 1)]),
        row(2, &[], &[(2, 2)]),
    ];
    let table = rank_business(&rows);
    let sat = table
        .iter()
        .find(|r| r.kind == RankKind::Satisfaction && r.mot == MOT_CATEGORIES[2])
        .unwrap();
    assert_eq!(sat.avg_sentiment, Some(1.33));
}

#[test]
fn aggregation_is_idempotent() {
    let rows = vec![
        row(0, &[(0, true), (3, true)], &[(0, 3), (3, 1)]),
        row(1, &[(3, true)], &[(3, 2)]),
    ];
    let first = rank_business(&rows);
    let second = rank_business(&rows);
    assert_eq!(first, second);
}

#[test]
fn importance_ties_keep_taxonomy_order() {
    let rows = vec![row(0, &[], &[])];
    let table = rank_business(&rows);
    let imp_mots: Vec<&str> = table
        .iter()
        .filter(|r| r.kind == RankKind::Importance)
        .map(|r| r.mot.as_str())
        .collect();
    assert_eq!(imp_mots, MOT_CATEGORIES.to_vec());
}

#[test]
fn unscored_categories_sort_last_in_satisfaction() {
    let rows = vec![row(0, &[], &[(0, 3), (1, 1)])];
    let table = rank_business(&rows);
    let sat: Vec<_> = table
        .iter()
        .filter(|r| r.kind == RankKind::Satisfaction)
        .collect();
    assert_eq!(sat[0].mot, MOT_CATEGORIES[1]);
    assert_eq!(sat[0].avg_sentiment, Some(1.0));
    assert_eq!(sat[1].mot, MOT_CATEGORIES[0]);
    assert!(sat[2..].iter().all(|r| r.avg_sentiment.is_none()));
}

#[test]
fn ranked_table_persists_with_two_decimal_means() {
    let tmp = TempDir::new().unwrap();
    let settings = test_settings(tmp.path());
    let rows = vec![
        row(0, &[(0, true)], &[(0, 3)]),
        row(1, &[(0, true)], &[(0, 2)]),
    ];
    reviews::write_classified(&rows, &settings).unwrap();
    ranking::rank_all(&settings).unwrap();

    let table = ranking::load_table("Mezzaluna", &settings).unwrap();
    assert_eq!(table.len(), MOT_CATEGORIES.len() * 2);
    let sat = table
        .iter()
        .find(|r| r.kind == RankKind::Satisfaction && r.mot == MOT_CATEGORIES[0])
        .unwrap();
    assert_eq!(sat.avg_sentiment, Some(2.5));

    let raw = fs::read_to_string(ranking::ranking_path("Mezzaluna", &settings)).unwrap();
    let header = raw.lines().next().unwrap();
    assert_eq!(header, "Type,MOT,Mentions,Avg_Sentiment");
    assert!(raw.contains("2.50"));
}
