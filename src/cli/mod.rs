//! Command-line interface wiring for mot-insight.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Settings;

pub mod classify;
pub mod ingest;
pub mod insight;
pub mod rank;
pub mod retrieve;
pub mod serve;
pub mod submit;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Moment-of-Truth review insight toolkit", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Ingest(args) => ingest::run(args, settings).await,
            Commands::Classify(args) => classify::run(args, settings).await,
            Commands::Submit(args) => submit::run(args, settings).await,
            Commands::Retrieve(args) => retrieve::run(args, settings).await,
            Commands::Rank => rank::run(settings).await,
            Commands::Insight(args) => insight::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract and clean raw review/business JSON into the review file.
    Ingest(ingest::Args),
    /// Classify reviews synchronously with per-review retry.
    Classify(classify::Args),
    /// Build and submit a batch classification job.
    Submit(submit::Args),
    /// Poll a batch job and merge its results into the classified dataset.
    Retrieve(retrieve::Args),
    /// Aggregate the classified dataset into per-business ranking tables.
    Rank,
    /// Generate narrative insight for one business's ranking table.
    Insight(insight::Args),
    /// Serve the ranking JSON API.
    Serve(serve::Args),
}

/// View of a business covered by generated insight.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum InsightFocus {
    /// Mention-count importance ranking.
    Importance,
    /// Mean-sentiment satisfaction ranking.
    Satisfaction,
    /// Median-split priority matrix.
    Quadrant,
}
