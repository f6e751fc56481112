//! Command-line interface wiring for cdr-pipeline.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod export;
pub mod extract;
pub mod fetch;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Chemical-disease relation candidates from PubMed abstracts",
    long_about = None
)]
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
            Commands::Fetch(args) => fetch::run(args, settings).await,
            Commands::Extract(args) => extract::run(args, settings).await,
            Commands::Export(args) => export::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch PubMed abstracts by PMID list or search query.
    Fetch(fetch::Args),
    /// Extract sentence-level chemical-disease candidates.
    Extract(extract::Args),
    /// Export candidate relations to a flat CSV for manual review.
    Export(export::Args),
}
