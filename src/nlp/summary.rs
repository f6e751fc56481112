//! Running counters over emitted candidate records, for human-readable reports.

use std::{collections::BTreeMap, fmt};

use crate::nlp::{candidates::SentenceCandidateRecord, cues::Polarity};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionSummary {
    pub documents: usize,
    pub total_sentences: usize,
    pub sentences_with_entities: usize,
    pub sentences_with_pairs: usize,
    pub polarity_counts: BTreeMap<Polarity, usize>,
    pub score_min: Option<f64>,
    pub score_max: Option<f64>,
}

impl ExtractionSummary {
    pub fn observe(&mut self, record: &SentenceCandidateRecord) {
        self.total_sentences += 1;
        if record.has_entities() {
            self.sentences_with_entities += 1;
        }
        if !record.pairs.is_empty() {
            self.sentences_with_pairs += 1;
        }
        *self.polarity_counts.entry(record.polarity).or_insert(0) += 1;
        self.score_min = Some(self.score_min.map_or(record.score, |m| m.min(record.score)));
        self.score_max = Some(self.score_max.map_or(record.score, |m| m.max(record.score)));
    }
}

impl fmt::Display for ExtractionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total sentences: {}", self.total_sentences)?;
        writeln!(f, "Sentences with any entities: {}", self.sentences_with_entities)?;
        writeln!(f, "Sentences with pairs: {}", self.sentences_with_pairs)?;
        if let (Some(min), Some(max)) = (self.score_min, self.score_max) {
            writeln!(f, "Score range: {min:.1} .. {max:.1}")?;
        }
        if !self.polarity_counts.is_empty() {
            writeln!(f, "Polarity counts:")?;
            for (polarity, count) in &self.polarity_counts {
                writeln!(f, "  {polarity}: {count}")?;
            }
        }
        Ok(())
    }
}
