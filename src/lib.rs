//! Chemical-disease relation candidate pipeline: fetch, extract, export.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;
