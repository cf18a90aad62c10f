use mot_insight::{
    classify::{diagnostics::Diagnostics, join, ClassificationResult},
    data::reviews::ReviewRecord,
};

fn reviews(n: i64) -> Vec<ReviewRecord> {
    (0..n)
        .map(|index| ReviewRecord {
            index,
            business: "Mezzaluna".to_string(),
            text: format!("review {index}"),
        })
        .collect()
}

#[test]
fn correlation_id_round_trips() {
    assert_eq!(
        join::parse_correlation_id(&join::correlation_id(17)),
        Some(17)
    );
    assert_eq!(join::parse_correlation_id("review-"), None);
    assert_eq!(join::parse_correlation_id("review-x7"), None);
    assert_eq!(join::parse_correlation_id("review-7-extra"), None);
}

#[test]
fn corrupted_identifier_drops_exactly_one_row() {
    let source = reviews(3);
    let results = vec![
        (
            "review-0".to_string(),
            ClassificationResult::degraded_default(),
        ),
        (
            "review-1".to_string(),
            ClassificationResult::degraded_default(),
        ),
        (
            "rev!ew-2".to_string(),
            ClassificationResult::degraded_default(),
        ),
    ];
    let mut diags = Diagnostics::new();
    let rows = join::join_results(&source, results, &mut diags);
    assert_eq!(rows.len(), 2);
    assert_eq!(diags.dropped_rows, 1);
    assert_eq!(diags.lines().len(), 1);
    assert!(diags.lines()[0].contains("rev!ew-2"));
}

#[test]
fn duplicate_identifier_keeps_the_first_response() {
    let mut first = ClassificationResult::degraded_default();
    first.degraded = false;
    first.sentiments[0] = 3;
    let results = vec![
        ("review-0".to_string(), first),
        (
            "review-0".to_string(),
            ClassificationResult::degraded_default(),
        ),
    ];
    let mut diags = Diagnostics::new();
    let rows = join::join_results(&reviews(1), results, &mut diags);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].result.sentiments[0], 3);
    assert_eq!(diags.dropped_rows, 1);
}

#[test]
fn orphan_identifier_is_dropped_with_diagnostic() {
    let results = vec![(
        "review-99".to_string(),
        ClassificationResult::degraded_default(),
    )];
    let mut diags = Diagnostics::new();
    let rows = join::join_results(&reviews(2), results, &mut diags);
    assert!(rows.is_empty());
    assert_eq!(diags.dropped_rows, 1);
}

#[test]
fn join_preserves_review_order() {
    let source = reviews(4);
    let results: Vec<_> = [3, 0, 2, 1]
        .iter()
        .map(|&index| {
            (
                join::correlation_id(index),
                ClassificationResult::degraded_default(),
            )
        })
        .collect();
    let mut diags = Diagnostics::new();
    let rows = join::join_results(&source, results, &mut diags);
    let indices: Vec<i64> = rows.iter().map(|row| row.review.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
    assert_eq!(diags.dropped_rows, 0);
}
