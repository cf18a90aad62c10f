//! Deterministic prompt construction for review classification.

use crate::taxonomy::MOT_CATEGORIES;

/// System role shared by the synchronous and batch strategies.
pub const SYSTEM_PROMPT: &str = "You are an AI expert in restaurant review analysis.";

/// Render the classification prompt for one review.
///
/// Pure: the same review text always yields the same prompt.
pub fn build_prompt(review_text: &str) -> String {
    let categories = MOT_CATEGORIES.join(", ");
    format!(
        r#"You are an AI expert in restaurant review analysis.

Your task is to analyse the provided customer review:
1. Identify whether each Moment of Truth (MoT) is mentioned in the review.
2. If a review does not explicitly mention an MoT, infer reasonable ones based on context.
3. For each MoT, mark it as 1 (mentioned) or 0 (not mentioned).
4. For each MoT, determine the sentiment as:
    - 3 for "Positive"
    - 2 for "Neutral"
    - 1 for "Negative"
    - 0 for "Not Mentioned"

Return your results in strict JSON format. No extra text.

MoT Categories:
{categories}

Review to analyse:
"{review_text}"

JSON Response Format Example:
{{
    "Arrival & First Impressions": 1,
    "Arrival & First Impressions_Sentiment": 2,
    "Waiting Time": 0,
    "Waiting Time_Sentiment": 0,
    ...
}}"#
    )
}
