//! Runtime configuration utilities for cdr-pipeline.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use serde::Deserialize;

const DEFAULT_TOOL: &str = "cdr_pipeline";
const DEFAULT_RETMAX: usize = 50;
const DEFAULT_CHUNK_SIZE: usize = 200;
const DEFAULT_THROTTLE_SECS: f64 = 0.35;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Contact email for the E-utilities usage policy.
    pub ncbi_email: Option<String>,
    /// Optional API key raising the E-utilities rate limit.
    pub ncbi_api_key: Option<String>,
    /// Tool name sent with PubMed requests.
    pub pubmed_tool: String,
    /// Maximum PMIDs returned by a search query.
    pub retmax: usize,
    /// PMIDs per efetch request.
    pub chunk_size: usize,
    /// Pause after each efetch request, in seconds.
    pub throttle_secs: f64,
    /// Lexicon file replacing the built-in recognizer dictionary.
    pub lexicon_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ncbi_email: None,
            ncbi_api_key: None,
            pubmed_tool: DEFAULT_TOOL.to_string(),
            retmax: DEFAULT_RETMAX,
            chunk_size: DEFAULT_CHUNK_SIZE,
            throttle_secs: DEFAULT_THROTTLE_SECS,
            lexicon_path: None,
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Ok(Self {
            ncbi_email: non_empty_var("NCBI_EMAIL"),
            ncbi_api_key: non_empty_var("NCBI_API_KEY"),
            pubmed_tool: non_empty_var("PUBMED_TOOL").unwrap_or(defaults.pubmed_tool),
            retmax: parsed_var("PUBMED_RETMAX").unwrap_or(defaults.retmax),
            chunk_size: parsed_var("PUBMED_CHUNK_SIZE").unwrap_or(defaults.chunk_size),
            throttle_secs: parsed_var("PUBMED_THROTTLE_SECS").unwrap_or(defaults.throttle_secs),
            lexicon_path: non_empty_var("CDR_LEXICON").map(PathBuf::from),
        })
    }

    /// Throttle interval as a `Duration`; negative, non-finite or
    /// out-of-range values collapse to zero.
    pub fn throttle(&self) -> Duration {
        Duration::try_from_secs_f64(self.throttle_secs).unwrap_or(Duration::ZERO)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
