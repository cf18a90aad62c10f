//! CLI entry-point for narrative insight generation.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    classify::client::OpenAiBackend,
    cli::InsightFocus,
    config::Settings,
    insight,
};

/// Args for the `insight` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Business name as written in the ranking outputs.
    #[arg(long)]
    pub business: String,
    /// Which view to narrate.
    #[arg(long, default_value = "quadrant", value_enum)]
    pub focus: InsightFocus,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let backend = OpenAiBackend::from_settings(&settings)?;
    let narrative = insight::generate(&backend, &args.business, args.focus, &settings).await?;
    println!("{narrative}");
    Ok(())
}
