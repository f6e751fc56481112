//! Domain errors raised before any pipeline stage does real work.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// NCBI asks every E-utilities client to identify itself.
    #[error("missing contact email: pass --email or set NCBI_EMAIL")]
    MissingEmail,
    #[error("no PMIDs found for the given input")]
    NoPmids,
    #[error("chunk size must be at least 1")]
    InvalidChunkSize,
}
