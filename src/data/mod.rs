//! Document ingestion, record storage and tabular export.

pub mod export;
pub mod pubmed;
pub mod store;
