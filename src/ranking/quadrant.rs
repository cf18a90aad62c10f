//! Median-split priority matrix over merged importance/satisfaction tables.

use std::cmp::Ordering;

use super::{RankKind, RankingRow};

/// Quadrant labels for the priority matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadrantLabel {
    /// High importance, low satisfaction.
    FixNow,
    /// High importance, high satisfaction.
    InvestFurther,
    /// Low importance, low satisfaction.
    Deprioritise,
    /// Low importance, high satisfaction.
    Maintain,
}

impl QuadrantLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixNow => "Fix Now",
            Self::InvestFurther => "Invest Further",
            Self::Deprioritise => "Deprioritise",
            Self::Maintain => "Maintain",
        }
    }
}

/// One MoT positioned on the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadrantPoint {
    pub mot: String,
    pub mentions: i64,
    pub avg_sentiment: f64,
    pub label: QuadrantLabel,
}

/// Merge a kind-tagged ranking table and place each MoT carrying both a
/// mention count and a satisfaction mean on the matrix; MoTs with no mean
/// are excluded. Splits are the per-business medians, recomputed per run.
pub fn classify_quadrants(table: &[RankingRow]) -> Vec<QuadrantPoint> {
    let mut merged: Vec<(String, i64, f64)> = Vec::new();
    for row in table.iter().filter(|row| row.kind == RankKind::Importance) {
        let Some(mentions) = row.mentions else {
            continue;
        };
        let avg_sentiment = table
            .iter()
            .find(|other| other.kind == RankKind::Satisfaction && other.mot == row.mot)
            .and_then(|other| other.avg_sentiment);
        if let Some(avg_sentiment) = avg_sentiment {
            merged.push((row.mot.clone(), mentions, avg_sentiment));
        }
    }
    if merged.is_empty() {
        return Vec::new();
    }

    let sentiment_split = median(merged.iter().map(|(_, _, s)| *s));
    let mention_split = median(merged.iter().map(|(_, m, _)| *m as f64));

    merged
        .into_iter()
        .map(|(mot, mentions, avg_sentiment)| QuadrantPoint {
            label: label_for(avg_sentiment, mentions as f64, sentiment_split, mention_split),
            mot,
            mentions,
            avg_sentiment,
        })
        .collect()
}

/// Urgency is asymmetric at the medians: a MoT is FixNow only when sentiment
/// is strictly below the split and mentions strictly above it; ties on
/// either axis fall to the satisfied/low-importance side.
fn label_for(
    sentiment: f64,
    mentions: f64,
    sentiment_split: f64,
    mention_split: f64,
) -> QuadrantLabel {
    if sentiment < sentiment_split && mentions > mention_split {
        QuadrantLabel::FixNow
    } else if sentiment >= sentiment_split && mentions > mention_split {
        QuadrantLabel::InvestFurther
    } else if sentiment < sentiment_split && mentions <= mention_split {
        QuadrantLabel::Deprioritise
    } else {
        QuadrantLabel::Maintain
    }
}

/// Median with the middle-pair mean for even-length inputs.
fn median(values: impl Iterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();
    if n == 0 {
        0.0
    } else if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
