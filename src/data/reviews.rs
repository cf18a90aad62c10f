//! Review dataset loading and classified-dataset persistence.

use std::fs::File;

use anyhow::{Context, Result};
use polars::prelude::{DataFrame, NamedFrom, ParquetReader, ParquetWriter, SerReader, Series};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{classify::ClassificationResult, config::Settings, taxonomy};

/// One source review; `index` is the stable join key assigned at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "review_index")]
    pub index: i64,
    pub business: String,
    #[serde(default)]
    pub text: String,
}

/// A review joined with its classification result; the canonical row of the
/// classified dataset, never mutated after the join.
#[derive(Debug, Clone)]
pub struct ClassifiedRow {
    pub review: ReviewRecord,
    pub result: ClassificationResult,
}

/// Load the tabular review file produced by `ingest`.
pub fn load_reviews(settings: &Settings) -> Result<Vec<ReviewRecord>> {
    let path = settings.join_data("reviews.csv");
    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("open {path:?}; run ingest first"))?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: ReviewRecord = result?;
        rows.push(row);
    }
    info!(rows = rows.len(), "loaded reviews");
    Ok(rows)
}

/// Persist the canonical classified dataset: one integer mention column and
/// one integer sentiment column per category, plus the degraded provenance
/// flag that separates substituted defaults from genuine classifications.
pub fn write_classified(rows: &[ClassifiedRow], settings: &Settings) -> Result<()> {
    let mut columns = vec![
        Series::new(
            "review_index".into(),
            rows.iter().map(|r| r.review.index).collect::<Vec<i64>>(),
        ),
        Series::new(
            "business".into(),
            rows.iter()
                .map(|r| r.review.business.clone())
                .collect::<Vec<String>>(),
        ),
        Series::new(
            "text".into(),
            rows.iter()
                .map(|r| r.review.text.clone())
                .collect::<Vec<String>>(),
        ),
        Series::new(
            "degraded".into(),
            rows.iter().map(|r| r.result.degraded).collect::<Vec<bool>>(),
        ),
    ];
    for (pos, mot) in taxonomy::MOT_CATEGORIES.iter().enumerate() {
        let mentions: Vec<i64> = rows
            .iter()
            .map(|r| i64::from(r.result.mentions[pos]))
            .collect();
        let sentiments: Vec<i64> = rows.iter().map(|r| r.result.sentiments[pos]).collect();
        columns.push(Series::new((*mot).into(), mentions));
        columns.push(Series::new(
            taxonomy::sentiment_column(mot).into(),
            sentiments,
        ));
    }
    let mut df = DataFrame::new(columns)?;

    let path = settings.join_data("clean/classified.parquet");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)?;
    ParquetWriter::new(file).finish(&mut df)?;
    info!(path = %path.display(), rows = df.height(), "wrote classified dataset");
    Ok(())
}

/// Reload the classified dataset wholesale for aggregation.
pub fn load_classified(settings: &Settings) -> Result<Vec<ClassifiedRow>> {
    let path = settings.join_data("clean/classified.parquet");
    if !path.exists() {
        anyhow::bail!("classified dataset missing at {path:?}; run classify or retrieve first");
    }
    let df = ParquetReader::new(File::open(&path)?).finish()?;
    let index_col = df.column("review_index")?.i64()?;
    let business_col = df.column("business")?.str()?;
    let text_col = df.column("text")?.str()?;
    let degraded_col = df.column("degraded")?.bool()?;
    let mut mention_cols = Vec::new();
    let mut sentiment_cols = Vec::new();
    for mot in taxonomy::MOT_CATEGORIES.iter() {
        mention_cols.push(df.column(mot)?.i64()?);
        sentiment_cols.push(df.column(taxonomy::sentiment_column(mot).as_str())?.i64()?);
    }

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        if let (Some(index), Some(business), Some(text), Some(degraded)) = (
            index_col.get(idx),
            business_col.get(idx),
            text_col.get(idx),
            degraded_col.get(idx),
        ) {
            let mut mentions = Vec::with_capacity(taxonomy::MOT_CATEGORIES.len());
            let mut sentiments = Vec::with_capacity(taxonomy::MOT_CATEGORIES.len());
            for pos in 0..taxonomy::MOT_CATEGORIES.len() {
                mentions.push(mention_cols[pos].get(idx).unwrap_or(0) != 0);
                sentiments.push(sentiment_cols[pos].get(idx).unwrap_or(0));
            }
            rows.push(ClassifiedRow {
                review: ReviewRecord {
                    index,
                    business: business.to_string(),
                    text: text.to_string(),
                },
                result: ClassificationResult {
                    mentions,
                    sentiments,
                    degraded,
                },
            });
        }
    }
    info!(rows = rows.len(), "loaded classified dataset");
    Ok(rows)
}
