//! CLI entry-point for the synchronous classification strategy.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    classify::{self, client::OpenAiBackend, RetryPolicy},
    config::Settings,
    data::reviews,
};

/// Args for the `classify` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Classify a deterministic sample of this many reviews.
    #[arg(long)]
    pub sample: Option<usize>,
    /// Seed for the sample selection.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let backend = OpenAiBackend::from_settings(&settings)?;
    let mut review_set = reviews::load_reviews(&settings)?;
    if let Some(n) = args.sample {
        review_set = classify::sample_reviews(review_set, n, args.seed);
        info!(sampled = review_set.len(), seed = args.seed, "sampled review subset");
    }

    let policy = RetryPolicy {
        backoff: settings.retry_backoff(),
        ..RetryPolicy::default()
    };
    let (rows, diags) = classify::classify_all(&backend, &review_set, policy).await;
    reviews::write_classified(&rows, &settings)?;
    info!(
        rows = rows.len(),
        degraded = diags.degraded_defaults,
        repaired = diags.repaired_fields,
        "classification complete"
    );
    Ok(())
}
