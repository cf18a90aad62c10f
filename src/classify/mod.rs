//! Review classification layer: prompt construction, chat backends,
//! synchronous and batch strategies, validation and result joining.

pub mod batch;
pub mod client;
pub mod diagnostics;
pub mod join;
pub mod prompt;
pub mod validate;

use std::time::Duration;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::{
    data::reviews::{ClassifiedRow, ReviewRecord},
    taxonomy::MOT_CATEGORIES,
};

use self::{
    client::{ChatBackend, ChatMessage},
    diagnostics::Diagnostics,
};

/// Attempts per review before degrading to the default result.
pub const MAX_ATTEMPTS: usize = 3;

/// Per-review classification outcome, aligned with `taxonomy::MOT_CATEGORIES`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Mention flag per category, taxonomy order.
    pub mentions: Vec<bool>,
    /// Sentiment code per category (0..=3), taxonomy order.
    pub sentiments: Vec<i64>,
    /// True when this result is a substituted default rather than a genuine
    /// classification (empty text, retry exhaustion, unparseable payload).
    pub degraded: bool,
}

impl ClassificationResult {
    /// All-unmentioned default substituted when classification cannot be obtained.
    pub fn degraded_default() -> Self {
        Self {
            mentions: vec![false; MOT_CATEGORIES.len()],
            sentiments: vec![0; MOT_CATEGORIES.len()],
            degraded: true,
        }
    }
}

/// Retry policy for the synchronous strategy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            backoff: Duration::from_secs(2),
        }
    }
}

/// Classify one review with bounded retry.
///
/// Empty review text short-circuits to the default without calling the
/// backend. An attempt fails when the transport errors or the completion is
/// not a JSON object; exhausting all attempts degrades to the default result
/// instead of failing past the per-review boundary.
pub async fn classify_review(
    backend: &dyn ChatBackend,
    review: &ReviewRecord,
    policy: RetryPolicy,
    diags: &mut Diagnostics,
) -> ClassificationResult {
    if review.text.trim().is_empty() {
        diags.empty_text(review.index);
        return ClassificationResult::degraded_default();
    }

    let correlation_id = join::correlation_id(review.index);
    let messages = vec![
        ChatMessage::system(prompt::SYSTEM_PROMPT),
        ChatMessage::user(prompt::build_prompt(&review.text)),
    ];

    for attempt in 1..=policy.max_attempts {
        match backend.complete(messages.clone(), 0.0).await {
            Ok(content) => {
                if let Some(payload) = validate::parse_object(&content) {
                    return validate::repair_payload(&payload, &correlation_id, diags);
                }
                debug!(index = review.index, attempt, "classifier returned invalid JSON");
            }
            Err(err) => {
                debug!(index = review.index, attempt, %err, "classification attempt failed");
            }
        }
        if attempt < policy.max_attempts {
            sleep(policy.backoff).await;
        }
    }

    diags.exhausted_retries(review.index, policy.max_attempts);
    ClassificationResult::degraded_default()
}

/// Run the synchronous strategy over a review set, sequentially.
pub async fn classify_all(
    backend: &dyn ChatBackend,
    reviews: &[ReviewRecord],
    policy: RetryPolicy,
) -> (Vec<ClassifiedRow>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let mut rows = Vec::with_capacity(reviews.len());
    for review in reviews {
        let result = classify_review(backend, review, policy, &mut diags).await;
        rows.push(ClassifiedRow {
            review: review.clone(),
            result,
        });
    }
    info!(
        rows = rows.len(),
        degraded = diags.degraded_defaults,
        repaired = diags.repaired_fields,
        "classification pass complete"
    );
    (rows, diags)
}

/// Deterministically sample up to `n` reviews with a fixed seed, keeping
/// index order in the output.
pub fn sample_reviews(reviews: Vec<ReviewRecord>, n: usize, seed: u64) -> Vec<ReviewRecord> {
    if reviews.len() <= n {
        return reviews;
    }
    let mut sampled = reviews;
    let mut rng = StdRng::seed_from_u64(seed);
    sampled.shuffle(&mut rng);
    sampled.truncate(n);
    sampled.sort_by_key(|review| review.index);
    sampled
}
