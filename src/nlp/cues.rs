//! Lexical cue matching and sentence polarity classification.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NEGATION_CUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(no|not|failed|fails|absence|absent|without|did not|lack)\b")
        .expect("valid regex")
});

static HEDGE_CUES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(may|might|suggest|possible|potential)\b").expect("valid regex"));

static POSITIVE_CUES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(associate|associated|correlat|link|linked|induce|induced|trigger|cause|caused|risk|increase|elevated)\b",
    )
    .expect("valid regex")
});

/// Heuristic guess at whether a sentence asserts, denies or hedges a relation.
///
/// Variants are declared alphabetically so the derived ordering matches the
/// label ordering used in summary reports.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Negative,
    Positive,
    Speculative,
    #[default]
    Unknown,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Positive => "positive",
            Self::Speculative => "speculative",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presence of each cue family in one sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CueMatches {
    pub negation: bool,
    pub hedge: bool,
    pub positive: bool,
}

impl CueMatches {
    pub fn scan(sentence: &str) -> Self {
        Self {
            negation: NEGATION_CUES.is_match(sentence),
            hedge: HEDGE_CUES.is_match(sentence),
            positive: POSITIVE_CUES.is_match(sentence),
        }
    }

    /// Negation beats hedge, hedge beats positive.
    pub fn polarity(&self) -> Polarity {
        if self.negation {
            Polarity::Negative
        } else if self.hedge {
            Polarity::Speculative
        } else if self.positive {
            Polarity::Positive
        } else {
            Polarity::Unknown
        }
    }
}

/// Classify the polarity of a sentence from its cue words.
pub fn classify_polarity(sentence: &str) -> Polarity {
    CueMatches::scan(sentence).polarity()
}
