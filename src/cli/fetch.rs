//! CLI entry-point for fetching PubMed abstracts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{
        pubmed::{self, EutilsClient},
        store::JsonlWriter,
    },
    error::PipelineError,
};

/// Args for the `fetch` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Text file with one PMID per line.
    #[arg(long)]
    pub pmids: Option<PathBuf>,
    /// PubMed query string for esearch.
    #[arg(long)]
    pub query: Option<String>,
    /// Maximum PMIDs returned by the query.
    #[arg(long)]
    pub retmax: Option<usize>,
    /// Output JSONL file path.
    #[arg(long)]
    pub out: PathBuf,
    /// Contact email for the NCBI usage policy (falls back to NCBI_EMAIL).
    #[arg(long)]
    pub email: Option<String>,
    /// NCBI API key (falls back to NCBI_API_KEY).
    #[arg(long)]
    pub api_key: Option<String>,
    /// PMIDs per efetch request.
    #[arg(long)]
    pub chunk_size: Option<usize>,
    /// Seconds to pause after each efetch request.
    #[arg(long)]
    pub throttle: Option<f64>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, mut settings: Settings) -> Result<()> {
    if let Some(retmax) = args.retmax {
        settings.retmax = retmax;
    }
    if let Some(chunk_size) = args.chunk_size {
        settings.chunk_size = chunk_size;
    }
    if let Some(throttle) = args.throttle {
        settings.throttle_secs = throttle;
    }
    let email = args
        .email
        .or(settings.ncbi_email.clone())
        .ok_or(PipelineError::MissingEmail)?;
    let api_key = args.api_key.or(settings.ncbi_api_key.clone());
    let client = EutilsClient::new(email, api_key, settings.pubmed_tool.clone())?;

    let mut collected = Vec::new();
    if let Some(path) = &args.pmids {
        collected.extend(pubmed::read_pmid_file(path)?);
    }
    if let Some(query) = &args.query {
        let found = client
            .search(query, settings.retmax)
            .await
            .with_context(|| format!("search pubmed for {query:?}"))?;
        collected.extend(found);
    }
    let pmids = pubmed::unique_pmids(collected);
    if pmids.is_empty() {
        return Err(PipelineError::NoPmids.into());
    }
    info!(count = pmids.len(), chunk_size = settings.chunk_size, "fetching abstracts");

    let mut writer = JsonlWriter::create(&args.out)?;
    let fetched = client
        .fetch_records(&pmids, settings.chunk_size, settings.throttle(), |record| {
            writer.write(&record)
        })
        .await?;
    writer.finish()?;

    println!(
        "Wrote {fetched} records for {} PMIDs to {}",
        pmids.len(),
        args.out.display()
    );
    Ok(())
}
