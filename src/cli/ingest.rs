//! CLI entry-point for extracting raw review data.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, data};

/// Args for the `ingest` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Newline-delimited JSON review records.
    #[arg(long)]
    pub reviews: PathBuf,
    /// Newline-delimited JSON business metadata records.
    #[arg(long)]
    pub meta: PathBuf,
    /// Comma separated list of business identifiers to keep.
    #[arg(long, value_delimiter = ',')]
    pub businesses: Vec<String>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    data::ingest::extract_reviews(&args.reviews, &args.meta, &args.businesses, &settings)?;
    Ok(())
}
