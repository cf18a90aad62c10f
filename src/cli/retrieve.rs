//! CLI entry-point for retrieving and merging batch results.

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    classify::{batch, diagnostics::Diagnostics, join, validate, ClassificationResult},
    config::Settings,
    data::reviews,
};

/// Args for the `retrieve` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Batch job identifier; defaults to the most recently submitted job.
    #[arg(long)]
    pub batch_id: Option<String>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let batch_id = match args.batch_id {
        Some(id) => id,
        None => batch::last_batch_id(&settings)
            .context("no batch id given and none remembered; run submit first")?,
    };

    let job = batch::wait_for_completion(&batch_id, &settings).await?;
    let log_text = batch::fetch_output(&job, &settings).await?;

    let mut diags = Diagnostics::new();
    let results: Vec<(String, ClassificationResult)> = batch::parse_response_log(&log_text)
        .into_iter()
        .map(|(custom_id, content)| {
            let result = validate::validate_content(&content, &custom_id, &mut diags);
            (custom_id, result)
        })
        .collect();

    let review_set = reviews::load_reviews(&settings)?;
    let rows = join::join_results(&review_set, results, &mut diags);
    reviews::write_classified(&rows, &settings)?;
    info!(
        rows = rows.len(),
        degraded = diags.degraded_defaults,
        repaired = diags.repaired_fields,
        dropped = diags.dropped_rows,
        "batch results merged"
    );
    Ok(())
}
