//! HTTP route handlers for Axum.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::{
    api::types::{QuadrantDto, RankingDto},
    ranking::{self, quadrant},
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Businesses that currently have a persisted ranking table.
pub async fn list_businesses(states: State<AppState>) -> ApiResult<Vec<String>> {
    let mut names = Vec::new();
    let entries = match std::fs::read_dir(&states.settings.outputs_dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(%err, "outputs dir unreadable; run rank first");
            return Ok(Json(names));
        }
    };
    for entry in entries.flatten() {
        let file_name = entry.file_name().to_string_lossy().to_string();
        if let Some(stem) = file_name.strip_suffix("_mot_ranking.csv") {
            names.push(stem.replace('_', " "));
        }
    }
    names.sort();
    Ok(Json(names))
}

pub async fn get_rankings(
    Path(business): Path<String>,
    states: State<AppState>,
) -> ApiResult<Vec<RankingDto>> {
    let table = ranking::load_table(&business, &states.settings)
        .map_err(|err| (StatusCode::NOT_FOUND, err.to_string()))?;
    let dtos = table
        .into_iter()
        .map(|row| RankingDto {
            kind: row.kind.as_str().to_string(),
            mot: row.mot,
            mentions: row.mentions,
            avg_sentiment: row.avg_sentiment,
        })
        .collect();
    Ok(Json(dtos))
}

pub async fn get_quadrant(
    Path(business): Path<String>,
    states: State<AppState>,
) -> ApiResult<Vec<QuadrantDto>> {
    let table = ranking::load_table(&business, &states.settings)
        .map_err(|err| (StatusCode::NOT_FOUND, err.to_string()))?;
    let dtos = quadrant::classify_quadrants(&table)
        .into_iter()
        .map(|point| QuadrantDto {
            mot: point.mot,
            mentions: point.mentions,
            avg_sentiment: point.avg_sentiment,
            quadrant: point.label.as_str().to_string(),
        })
        .collect();
    Ok(Json(dtos))
}
