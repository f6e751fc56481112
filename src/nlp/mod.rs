//! Natural language processing orchestration layer.

pub mod candidates;
pub mod cues;
pub mod ner;
pub mod summary;

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::data::{
    pubmed::PubRecord,
    store::{JsonlReader, JsonlWriter},
};
use candidates::SentenceCandidateRecord;
use ner::Recognizer;
use summary::ExtractionSummary;

/// Per-document driver turning recogniser output into candidate records.
pub struct CandidateExtractor<'a> {
    recognizer: &'a dyn Recognizer,
    summary: ExtractionSummary,
}

impl<'a> CandidateExtractor<'a> {
    pub fn new(recognizer: &'a dyn Recognizer) -> Self {
        Self {
            recognizer,
            summary: ExtractionSummary::default(),
        }
    }

    /// One record per sentence; documents without title or abstract text yield none.
    pub fn process_document(&mut self, document: &PubRecord) -> Vec<SentenceCandidateRecord> {
        let text = document.combined_text();
        if text.trim().is_empty() {
            debug!(pmid = %document.pmid, "skipping document without text");
            return Vec::new();
        }
        self.summary.documents += 1;
        let records: Vec<SentenceCandidateRecord> = self
            .recognizer
            .segment_and_tag(&text)
            .iter()
            .map(|sentence| candidates::build_record(&document.pmid, sentence))
            .collect();
        for record in &records {
            self.summary.observe(record);
        }
        records
    }

    pub fn into_summary(self) -> ExtractionSummary {
        self.summary
    }
}

/// Run candidate extraction from an abstracts JSONL file into a candidates JSONL file.
pub fn extract_candidates(
    input: &Path,
    output: &Path,
    recognizer: &dyn Recognizer,
) -> Result<ExtractionSummary> {
    info!(input = %input.display(), "starting candidate extraction");
    let mut writer = JsonlWriter::create(output)?;
    let mut extractor = CandidateExtractor::new(recognizer);
    for document in JsonlReader::<PubRecord>::open(input)? {
        for record in extractor.process_document(&document?) {
            writer.write(&record)?;
        }
    }
    writer.finish()?;
    let summary = extractor.into_summary();
    info!(
        documents = summary.documents,
        sentences = summary.total_sentences,
        with_pairs = summary.sentences_with_pairs,
        "finished candidate extraction"
    );
    Ok(summary)
}
