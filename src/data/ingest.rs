//! One-off extraction of raw review/business JSON into the tabular review file.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Settings;

#[derive(Debug, Deserialize)]
struct RawReview {
    gmap_id: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBusiness {
    gmap_id: String,
    name: String,
}

/// Filter raw newline-delimited JSON reviews to the selected businesses,
/// join display names, drop text-less records and assign dense stable
/// indices. Writes `reviews.csv` under the data dir and returns the row count.
pub fn extract_reviews(
    reviews_path: &Path,
    meta_path: &Path,
    business_ids: &[String],
    settings: &Settings,
) -> Result<usize> {
    let names = load_business_names(meta_path, business_ids)?;
    if names.is_empty() {
        warn!("no metadata matched the requested business ids");
    }

    let file =
        File::open(reviews_path).with_context(|| format!("open reviews {reviews_path:?}"))?;
    let reader = BufReader::new(file);

    let out_path = settings.join_data("reviews.csv");
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(&out_path)?;
    writer.write_record(["review_index", "business", "text"])?;

    let mut index: i64 = 0;
    let mut skipped_textless = 0u64;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let review: RawReview = match serde_json::from_str(&line) {
            Ok(review) => review,
            Err(err) => {
                warn!(%err, "skipping malformed review line");
                continue;
            }
        };
        let Some(name) = names.get(&review.gmap_id) else {
            continue;
        };
        let Some(text) = review.text else {
            skipped_textless += 1;
            continue;
        };
        let index_field = index.to_string();
        writer.write_record([index_field.as_str(), name.as_str(), text.as_str()])?;
        index += 1;
    }
    writer.flush()?;
    info!(
        path = %out_path.display(),
        rows = index,
        skipped_textless,
        "wrote review file"
    );
    Ok(index as usize)
}

fn load_business_names(
    meta_path: &Path,
    business_ids: &[String],
) -> Result<IndexMap<String, String>> {
    let file = File::open(meta_path).with_context(|| format!("open metadata {meta_path:?}"))?;
    let reader = BufReader::new(file);
    let mut names = IndexMap::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let business: RawBusiness = match serde_json::from_str(&line) {
            Ok(business) => business,
            Err(err) => {
                warn!(%err, "skipping malformed metadata line");
                continue;
            }
        };
        if business_ids.contains(&business.gmap_id) {
            names.insert(business.gmap_id, business.name);
        }
    }
    info!(businesses = names.len(), "loaded business metadata");
    Ok(names)
}
