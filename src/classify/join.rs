//! Correlation of classification results back to source reviews.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::{
    classify::{diagnostics::Diagnostics, ClassificationResult},
    data::reviews::{ClassifiedRow, ReviewRecord},
};

/// Prefix-plus-index correlation identifier carried on every batch line.
pub fn correlation_id(index: i64) -> String {
    format!("review-{index}")
}

static CORRELATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^review-(\d+)$").expect("valid regex"));

/// Extract the review index embedded in a correlation identifier.
pub fn parse_correlation_id(custom_id: &str) -> Option<i64> {
    CORRELATION
        .captures(custom_id)
        .and_then(|caps| caps[1].parse().ok())
}

/// Inner-join classification results onto source reviews by stable index.
///
/// Responses with malformed or duplicate identifiers, or with no matching
/// review, are dropped with a diagnostic; every surviving review index
/// yields exactly one classified row.
pub fn join_results(
    reviews: &[ReviewRecord],
    results: Vec<(String, ClassificationResult)>,
    diags: &mut Diagnostics,
) -> Vec<ClassifiedRow> {
    let mut by_index: HashMap<i64, (String, ClassificationResult)> = HashMap::new();
    for (custom_id, result) in results {
        let Some(index) = parse_correlation_id(&custom_id) else {
            diags.correlation_failure(&custom_id);
            continue;
        };
        if by_index.contains_key(&index) {
            diags.duplicate_identifier(&custom_id);
            continue;
        }
        by_index.insert(index, (custom_id, result));
    }

    let mut rows = Vec::new();
    for review in reviews {
        if let Some((_, result)) = by_index.remove(&review.index) {
            rows.push(ClassifiedRow {
                review: review.clone(),
                result,
            });
        }
    }
    for (custom_id, _) in by_index.into_values() {
        diags.unmatched_review(&custom_id);
    }

    info!(
        rows = rows.len(),
        dropped = diags.dropped_rows,
        "joined classification results"
    );
    rows
}
