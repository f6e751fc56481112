//! Flatten sentence candidate records into a curation-ready CSV.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{
    data::store::{ensure_parent, JsonlReader},
    nlp::cues::Polarity,
};

/// Lenient view of a candidate record. Missing or `null` fields fall back
/// to empty values so a partially written file still exports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportInput {
    #[serde(default)]
    pub pmid: Value,
    #[serde(default)]
    pub sentence: Option<String>,
    #[serde(default)]
    pub pairs: Option<Vec<ExportPair>>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub polarity_guess: Option<Polarity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportPair {
    #[serde(default)]
    pub chemical: Option<String>,
    #[serde(default)]
    pub disease: Option<String>,
}

impl ExportInput {
    /// Identifier as written in the CSV; numeric ids are rendered verbatim.
    fn pmid_cell(&self) -> String {
        match &self.pmid {
            Value::Null => String::new(),
            Value::String(pmid) => pmid.clone(),
            other => other.to_string(),
        }
    }
}

/// One CSV row. Normalisation and curation columns are always left blank
/// so a manual review pass can fill them in against a stable schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub pmid: String,
    pub chemical: String,
    pub disease: String,
    pub evidence_sentence: String,
    pub polarity_guess: Polarity,
    pub score: Option<f64>,
    pub chemical_norm_id: String,
    pub disease_norm_id: String,
    pub manual_label: String,
    pub manual_confidence: String,
    pub error_type: String,
}

pub const EXPORT_COLUMNS: [&str; 11] = [
    "pmid",
    "chemical",
    "disease",
    "evidence_sentence",
    "polarity_guess",
    "score",
    "chemical_norm_id",
    "disease_norm_id",
    "manual_label",
    "manual_confidence",
    "error_type",
];

/// Expand one record into zero or more rows, one per pair.
///
/// With `include_no_pairs`, a pairless record yields a single placeholder
/// row with empty chemical and disease cells.
pub fn flatten_record(record: &ExportInput, include_no_pairs: bool) -> Vec<ExportRow> {
    let placeholder = [ExportPair::default()];
    let pairs: &[ExportPair] = match record.pairs.as_deref() {
        Some(pairs) if !pairs.is_empty() => pairs,
        _ if include_no_pairs => &placeholder,
        _ => return Vec::new(),
    };
    let pmid = record.pmid_cell();
    let sentence = record.sentence.clone().unwrap_or_default();
    pairs
        .iter()
        .map(|pair| ExportRow {
            pmid: pmid.clone(),
            chemical: pair.chemical.clone().unwrap_or_default(),
            disease: pair.disease.clone().unwrap_or_default(),
            evidence_sentence: sentence.clone(),
            polarity_guess: record.polarity_guess.unwrap_or_default(),
            score: record.score,
            chemical_norm_id: String::new(),
            disease_norm_id: String::new(),
            manual_label: String::new(),
            manual_confidence: String::new(),
            error_type: String::new(),
        })
        .collect()
}

/// Read candidate JSONL from `input` and write the flattened CSV to `output`.
///
/// Returns the number of data rows written.
pub fn export_csv(input: &Path, output: &Path, include_no_pairs: bool) -> Result<usize> {
    ensure_parent(output)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output)
        .with_context(|| format!("create {}", output.display()))?;
    writer.write_record(EXPORT_COLUMNS)?;

    let mut rows = 0usize;
    for record in JsonlReader::<ExportInput>::open(input)? {
        for row in flatten_record(&record?, include_no_pairs) {
            writer.serialize(&row)?;
            rows += 1;
        }
    }
    writer.flush()?;
    info!(path = %output.display(), rows, "wrote candidate csv");
    Ok(rows)
}
