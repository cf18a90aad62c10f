//! Human-readable data-quality diagnostics for the classification pipeline.

use serde_json::Value;
use tracing::warn;

/// Collects diagnostic lines alongside audit counters.
///
/// Every validation repair, correlation failure and classifier exhaustion
/// lands here, so a run can be audited after the fact: degraded defaults are
/// schema-indistinguishable from genuine all-zero rows apart from their
/// provenance flag, and these counters are the other half of that audit.
#[derive(Debug, Default)]
pub struct Diagnostics {
    lines: Vec<String>,
    /// Reviews that received the all-default result instead of a genuine
    /// classification.
    pub degraded_defaults: usize,
    /// Individual fields repaired to their default value.
    pub repaired_fields: usize,
    /// Responses dropped because they could not be correlated to a review.
    pub dropped_rows: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, line: String) {
        warn!("{line}");
        self.lines.push(line);
    }

    pub fn empty_text(&mut self, index: i64) {
        self.degraded_defaults += 1;
        self.record(format!(
            "review {index}: empty review text, substituting default classification"
        ));
    }

    pub fn exhausted_retries(&mut self, index: i64, attempts: usize) {
        self.degraded_defaults += 1;
        self.record(format!(
            "review {index}: exhausted {attempts} classification attempts, substituting default"
        ));
    }

    pub fn parse_failure(&mut self, correlation_id: &str) {
        self.degraded_defaults += 1;
        self.record(format!(
            "{correlation_id}: response is not a JSON object, substituting default classification"
        ));
    }

    pub fn invalid_mention(&mut self, correlation_id: &str, field: &str, value: &Value) {
        self.repaired_fields += 1;
        self.record(format!(
            "{correlation_id}: invalid mention value {value} for '{field}', defaulting to 0"
        ));
    }

    pub fn invalid_sentiment(&mut self, correlation_id: &str, field: &str, value: &Value) {
        self.repaired_fields += 1;
        self.record(format!(
            "{correlation_id}: invalid sentiment value {value} for '{field}', defaulting to 0"
        ));
    }

    pub fn correlation_failure(&mut self, custom_id: &str) {
        self.dropped_rows += 1;
        self.record(format!(
            "'{custom_id}': unrecognised correlation identifier, dropping response"
        ));
    }

    pub fn duplicate_identifier(&mut self, custom_id: &str) {
        self.dropped_rows += 1;
        self.record(format!(
            "'{custom_id}': duplicate correlation identifier, dropping later response"
        ));
    }

    pub fn unmatched_review(&mut self, custom_id: &str) {
        self.dropped_rows += 1;
        self.record(format!(
            "'{custom_id}': no source review with this index, dropping response"
        ));
    }

    /// Recorded diagnostic lines, in emission order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}
