//! Shared DTOs for JSON responses.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RankingDto {
    pub kind: String,
    pub mot: String,
    pub mentions: Option<i64>,
    pub avg_sentiment: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuadrantDto {
    pub mot: String,
    pub mentions: i64,
    pub avg_sentiment: f64,
    pub quadrant: String,
}
