//! Classifier response validation and field-level repair.

use serde_json::{Map, Value};

use crate::{
    classify::{diagnostics::Diagnostics, ClassificationResult},
    taxonomy,
};

/// Parse completion content into the JSON object the prompt demands.
///
/// The synchronous strategy treats `None` as a failed attempt and retries;
/// the batch strategy degrades the review instead.
pub fn parse_object(content: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(content.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Validate raw completion content, degrading the whole review to the
/// default result when it is not a JSON object.
pub fn validate_content(
    content: &str,
    correlation_id: &str,
    diags: &mut Diagnostics,
) -> ClassificationResult {
    match parse_object(content) {
        Some(payload) => repair_payload(&payload, correlation_id, diags),
        None => {
            diags.parse_failure(correlation_id);
            ClassificationResult::degraded_default()
        }
    }
}

/// Repair a parsed payload field-by-field against the taxonomy.
///
/// Absent mention flags default to false silently; present-but-invalid
/// mention values and absent or out-of-domain sentiment codes default with a
/// diagnostic naming the correlation id, field and value. Cross-field
/// consistency between flag and sentiment is deliberately not enforced.
pub fn repair_payload(
    payload: &Map<String, Value>,
    correlation_id: &str,
    diags: &mut Diagnostics,
) -> ClassificationResult {
    let mut mentions = Vec::with_capacity(taxonomy::MOT_CATEGORIES.len());
    let mut sentiments = Vec::with_capacity(taxonomy::MOT_CATEGORIES.len());
    for mot in taxonomy::MOT_CATEGORIES.iter() {
        mentions.push(mention_flag(payload, mot, correlation_id, diags));
        sentiments.push(sentiment_code(payload, mot, correlation_id, diags));
    }
    ClassificationResult {
        mentions,
        sentiments,
        degraded: false,
    }
}

fn mention_flag(
    payload: &Map<String, Value>,
    mot: &str,
    correlation_id: &str,
    diags: &mut Diagnostics,
) -> bool {
    match payload.get(mot) {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(value) => match value.as_i64() {
            Some(0) => false,
            Some(1) => true,
            _ => {
                diags.invalid_mention(correlation_id, mot, value);
                false
            }
        },
    }
}

fn sentiment_code(
    payload: &Map<String, Value>,
    mot: &str,
    correlation_id: &str,
    diags: &mut Diagnostics,
) -> i64 {
    let field = taxonomy::sentiment_column(mot);
    let value = payload.get(&field).unwrap_or(&Value::Null);
    match value.as_i64() {
        Some(code) if taxonomy::is_valid_sentiment(code) => code,
        _ => {
            diags.invalid_sentiment(correlation_id, &field, value);
            0
        }
    }
}
