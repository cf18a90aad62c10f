//! CLI entry-point for submitting a batch classification job.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{classify::batch, config::Settings, data::reviews};

/// Args for the `submit` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Submit only the first N reviews (defaults to all).
    #[arg(long)]
    pub limit: Option<usize>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let mut review_set = reviews::load_reviews(&settings)?;
    if let Some(limit) = args.limit {
        review_set.truncate(limit);
    }

    let job = batch::submit(&review_set, &settings).await?;
    batch::remember_batch_id(&job.id, &settings)?;
    info!(batch_id = %job.id, "batch submitted; run `retrieve` once the job completes");
    println!("{}", job.id);
    Ok(())
}
