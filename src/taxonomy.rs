//! Fixed Moment-of-Truth taxonomy shared by every pipeline stage.

/// Moments of Truth in display order. The order matters only for
/// presentation; the set defines the classification schema.
pub const MOT_CATEGORIES: [&str; 12] = [
    "Arrival & First Impressions",
    "Waiting Time",
    "Ambience & Atmosphere",
    "Service Interaction",
    "Menu Presentation & Ordering",
    "Food & Drink Arrival Time",
    "Food Quality & Presentation",
    "Handling of Dietary Requirements",
    "Toilet Cleanliness & Maintenance",
    "Billing & Payment Process",
    "Issue Resolution & Complaint Handling",
    "Word-of-Mouth & Recommendations",
];

/// Sentiment codes: 0 = not mentioned, 1 = negative, 2 = neutral, 3 = positive.
pub fn is_valid_sentiment(code: i64) -> bool {
    (0..=3).contains(&code)
}

/// Column name carrying the sentiment code for a category.
pub fn sentiment_column(mot: &str) -> String {
    format!("{mot}_Sentiment")
}

/// Human label for an average sentiment score, used by insight prompts.
pub fn sentiment_label(score: f64) -> &'static str {
    if score <= 0.0 {
        "Not Mentioned"
    } else if score < 2.0 {
        "Negative"
    } else if score < 3.0 {
        "Neutral"
    } else {
        "Positive"
    }
}
