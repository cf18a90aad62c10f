//! Ranking aggregation layer: importance and satisfaction tables.

pub mod quadrant;

use std::{cmp::Ordering, path::PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{config::Settings, data::reviews::ClassifiedRow, taxonomy};

/// Which ranking a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankKind {
    Importance,
    Satisfaction,
}

impl RankKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Importance => "Importance",
            Self::Satisfaction => "Satisfaction",
        }
    }
}

/// One row of a per-business ranking table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    pub kind: RankKind,
    pub mot: String,
    pub mentions: Option<i64>,
    pub avg_sentiment: Option<f64>,
}

/// Build the combined kind-tagged ranking table for one business's rows.
///
/// Importance descends by mention count, with taxonomy order breaking ties
/// via stable sort. Satisfaction ascends by the mean of sentiment codes
/// strictly greater than zero (0 is a sentinel, not a scale point), rounded
/// to 2 decimal places; categories with no scored row carry no mean and sort
/// last.
pub fn rank_business(rows: &[ClassifiedRow]) -> Vec<RankingRow> {
    let mut importance = Vec::new();
    let mut satisfaction = Vec::new();

    for (pos, mot) in taxonomy::MOT_CATEGORIES.iter().enumerate() {
        let mentions = rows.iter().filter(|row| row.result.mentions[pos]).count() as i64;
        importance.push(RankingRow {
            kind: RankKind::Importance,
            mot: (*mot).to_string(),
            mentions: Some(mentions),
            avg_sentiment: None,
        });

        let scored: Vec<i64> = rows
            .iter()
            .map(|row| row.result.sentiments[pos])
            .filter(|&code| code > 0)
            .collect();
        let avg_sentiment = if scored.is_empty() {
            None
        } else {
            let mean = scored.iter().sum::<i64>() as f64 / scored.len() as f64;
            Some((mean * 100.0).round() / 100.0)
        };
        satisfaction.push(RankingRow {
            kind: RankKind::Satisfaction,
            mot: (*mot).to_string(),
            mentions: None,
            avg_sentiment,
        });
    }

    importance.sort_by_key(|row| std::cmp::Reverse(row.mentions.unwrap_or(0)));
    satisfaction.sort_by(|a, b| match (a.avg_sentiment, b.avg_sentiment) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    importance.extend(satisfaction);
    importance
}

/// Aggregate the classified dataset into per-business ranking tables,
/// regenerated in full each run.
pub fn rank_all(settings: &Settings) -> Result<()> {
    let rows = crate::data::reviews::load_classified(settings)?;
    if rows.is_empty() {
        warn!("classified dataset is empty; nothing to rank");
        return Ok(());
    }

    let mut by_business: IndexMap<String, Vec<ClassifiedRow>> = IndexMap::new();
    for row in rows {
        by_business
            .entry(row.review.business.clone())
            .or_default()
            .push(row);
    }

    for (business, rows) in &by_business {
        let table = rank_business(rows);
        write_table(business, &table, settings)?;
    }
    info!(businesses = by_business.len(), "wrote ranking tables");
    Ok(())
}

/// File-system-safe ranking file name for a business.
pub fn ranking_file_name(business: &str) -> String {
    format!(
        "{}_mot_ranking.csv",
        business.replace(' ', "_").replace('&', "and")
    )
}

pub fn ranking_path(business: &str, settings: &Settings) -> PathBuf {
    settings.join_output(ranking_file_name(business))
}

fn write_table(business: &str, table: &[RankingRow], settings: &Settings) -> Result<()> {
    let path = ranking_path(business, settings);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["Type", "MOT", "Mentions", "Avg_Sentiment"])?;
    for row in table {
        let mentions = row.mentions.map(|m| m.to_string()).unwrap_or_default();
        let avg = row
            .avg_sentiment
            .map(|v| format!("{v:.2}"))
            .unwrap_or_default();
        writer.write_record([row.kind.as_str(), row.mot.as_str(), &mentions, &avg])?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = table.len(), "wrote ranking table");
    Ok(())
}

/// Reload a persisted ranking table for the API and insight consumers.
pub fn load_table(business: &str, settings: &Settings) -> Result<Vec<RankingRow>> {
    let path = ranking_path(business, settings);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("open {path:?}; run rank first"))?;
    let mut out = Vec::new();
    for record in reader.deserialize::<RawRankingRow>() {
        let raw = record?;
        out.push(raw.try_into()?);
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct RawRankingRow {
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "MOT")]
    mot: String,
    #[serde(rename = "Mentions")]
    mentions: Option<i64>,
    #[serde(rename = "Avg_Sentiment")]
    avg_sentiment: Option<f64>,
}

impl TryFrom<RawRankingRow> for RankingRow {
    type Error = anyhow::Error;

    fn try_from(raw: RawRankingRow) -> Result<Self> {
        let kind = match raw.kind.as_str() {
            "Importance" => RankKind::Importance,
            "Satisfaction" => RankKind::Satisfaction,
            other => anyhow::bail!("unknown ranking kind '{other}'"),
        };
        Ok(Self {
            kind,
            mot: raw.mot,
            mentions: raw.mentions,
            avg_sentiment: raw.avg_sentiment,
        })
    }
}
