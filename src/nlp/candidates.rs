//! Candidate pair generation and heuristic scoring for one sentence.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::nlp::{
    cues::{classify_polarity, CueMatches, Polarity},
    ner::{EntityCategory, TaggedSentence},
};

/// Most pairs that each add a point in [`score`].
pub const PAIR_BONUS_CAP: usize = 3;

/// Hypothesised chemical-disease co-occurrence within one sentence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidatePair {
    pub chemical: String,
    pub disease: String,
}

/// Per-sentence output of the extraction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceCandidateRecord {
    #[serde(rename = "pmid")]
    pub document_id: String,
    #[serde(rename = "sentence")]
    pub sentence_text: String,
    pub chemicals: Vec<String>,
    pub diseases: Vec<String>,
    pub pairs: Vec<CandidatePair>,
    /// Relative ranking signal, not a probability. May be negative.
    pub score: f64,
    #[serde(rename = "polarity_guess")]
    pub polarity: Polarity,
}

impl SentenceCandidateRecord {
    pub fn has_entities(&self) -> bool {
        !self.chemicals.is_empty() || !self.diseases.is_empty()
    }
}

/// Deduplicate mention texts by exact equality and sort them ascending.
pub fn unique_sorted<I, S>(mentions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    mentions
        .into_iter()
        .map(Into::into)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Cross product of chemicals and diseases, chemical-major.
///
/// Both inputs are expected to come from [`unique_sorted`], which makes the
/// output ordered by `(chemical, disease)`.
pub fn generate_pairs(chemicals: &[String], diseases: &[String]) -> Vec<CandidatePair> {
    chemicals
        .iter()
        .flat_map(|chemical| {
            diseases.iter().map(move |disease| CandidatePair {
                chemical: chemical.clone(),
                disease: disease.clone(),
            })
        })
        .collect()
}

/// Additive heuristic score for a sentence.
///
/// Cue adjustments are applied independently of [`crate::nlp::cues::classify_polarity`],
/// so a sentence labelled negative can still collect the positive-cue bonus.
pub fn score(
    chemicals: &[String],
    diseases: &[String],
    pairs: &[CandidatePair],
    sentence: &str,
) -> f64 {
    let cues = CueMatches::scan(sentence);
    let mut score = 0.0;
    if !chemicals.is_empty() {
        score += 1.0;
    }
    if !diseases.is_empty() {
        score += 1.0;
    }
    if !pairs.is_empty() {
        score += 2.0;
        score += pairs.len().min(PAIR_BONUS_CAP) as f64;
    }
    if cues.positive {
        score += 1.0;
    }
    if cues.negation {
        score -= 1.0;
    }
    if cues.hedge {
        score -= 0.5;
    }
    score
}

/// Build the candidate record for one tagged sentence.
pub fn build_record(document_id: &str, sentence: &TaggedSentence) -> SentenceCandidateRecord {
    let mentions_of = |category: EntityCategory| {
        unique_sorted(
            sentence
                .entities
                .iter()
                .filter(|mention| mention.category == category)
                .map(|mention| mention.text.as_str()),
        )
    };
    let chemicals = mentions_of(EntityCategory::Chemical);
    let diseases = mentions_of(EntityCategory::Disease);
    let pairs = generate_pairs(&chemicals, &diseases);
    let heuristic = score(&chemicals, &diseases, &pairs, &sentence.text);
    let polarity = classify_polarity(&sentence.text);

    SentenceCandidateRecord {
        document_id: document_id.to_string(),
        sentence_text: sentence.text.clone(),
        chemicals,
        diseases,
        pairs,
        score: heuristic,
        polarity,
    }
}
