//! CLI entry-point for ranking aggregation.

use anyhow::Result;
use tracing::instrument;

use crate::{config::Settings, ranking};

#[instrument(skip(settings))]
pub async fn run(settings: Settings) -> Result<()> {
    ranking::rank_all(&settings)
}
