//! Dictionary-based sentence segmentation and chemical/disease tagging.
//!
//! Any recogniser can stand in for the dictionary matcher by implementing
//! [`Recognizer`]; the candidate stage only consumes [`TaggedSentence`]s.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use tracing::info;

/// Entity class assigned by a recogniser. Only chemicals and diseases take
/// part in candidate generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Chemical,
    Disease,
    Other,
}

/// Recognised span; offsets are byte positions within the sentence text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMention {
    pub start: usize,
    pub end: usize,
    pub category: EntityCategory,
    pub text: String,
}

/// One sentence together with the mentions found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSentence {
    pub text: String,
    pub entities: Vec<EntityMention>,
}

/// Sentence segmentation plus entity tagging over a document's text.
pub trait Recognizer: Send + Sync {
    fn segment_and_tag(&self, text: &str) -> Vec<TaggedSentence>;
}

/// Chemical and disease surface terms matched by [`DictionaryRecognizer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Lexicon {
    #[serde(default)]
    pub chemical: Vec<String>,
    #[serde(default)]
    pub disease: Vec<String>,
}

const BUILTIN_CHEMICALS: &[&str] = &[
    "acetaminophen",
    "amiodarone",
    "amphotericin B",
    "aspirin",
    "bleomycin",
    "caffeine",
    "carbamazepine",
    "cisplatin",
    "clozapine",
    "cocaine",
    "cyclophosphamide",
    "cyclosporine",
    "dexamethasone",
    "digoxin",
    "doxorubicin",
    "estrogen",
    "ethanol",
    "gentamicin",
    "haloperidol",
    "heparin",
    "ibuprofen",
    "isoniazid",
    "ketamine",
    "levodopa",
    "lidocaine",
    "lithium",
    "metformin",
    "methotrexate",
    "morphine",
    "nicotine",
    "paracetamol",
    "phenytoin",
    "prednisone",
    "rifampicin",
    "tacrolimus",
    "tamoxifen",
    "valproate",
    "valproic acid",
    "vancomycin",
    "warfarin",
];

const BUILTIN_DISEASES: &[&str] = &[
    "acute kidney injury",
    "agranulocytosis",
    "anemia",
    "arrhythmia",
    "bradycardia",
    "breast cancer",
    "cancer",
    "cardiomyopathy",
    "cardiotoxicity",
    "catalepsy",
    "depression",
    "diabetes",
    "dyskinesia",
    "epilepsy",
    "hepatitis",
    "hepatotoxicity",
    "hypertension",
    "hypotension",
    "liver injury",
    "myocardial infarction",
    "nephrotoxicity",
    "neutropenia",
    "ototoxicity",
    "pain",
    "parkinsonism",
    "proteinuria",
    "pulmonary fibrosis",
    "renal failure",
    "seizure",
    "seizures",
    "stroke",
    "thrombocytopenia",
    "thrombosis",
];

impl Lexicon {
    /// Small general-purpose lexicon used when no lexicon file is configured.
    pub fn builtin() -> Self {
        Self {
            chemical: BUILTIN_CHEMICALS.iter().map(|s| s.to_string()).collect(),
            disease: BUILTIN_DISEASES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Load a JSON lexicon of the form `{"chemical": [...], "disease": [...]}`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("decode lexicon {}", path.display()))
    }
}

/// Case-insensitive, word-bounded dictionary matcher.
pub struct DictionaryRecognizer {
    matchers: Vec<(EntityCategory, Regex)>,
}

impl DictionaryRecognizer {
    pub fn new(lexicon: &Lexicon) -> Result<Self> {
        let mut matchers = Vec::new();
        for (category, terms) in [
            (EntityCategory::Chemical, &lexicon.chemical),
            (EntityCategory::Disease, &lexicon.disease),
        ] {
            if let Some(regex) = term_matcher(terms)? {
                matchers.push((category, regex));
            }
        }
        Ok(Self { matchers })
    }

    fn tag(&self, sentence: &str) -> Vec<EntityMention> {
        let mut found: Vec<EntityMention> = self
            .matchers
            .iter()
            .flat_map(|(category, regex)| {
                regex.find_iter(sentence).map(move |m| EntityMention {
                    start: m.start(),
                    end: m.end(),
                    category: *category,
                    text: m.as_str().to_string(),
                })
            })
            .collect();
        // Earliest span wins; on equal starts the longer one does.
        found.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        let mut accepted: Vec<EntityMention> = Vec::with_capacity(found.len());
        for mention in found {
            if accepted.last().map_or(true, |prev| mention.start >= prev.end) {
                accepted.push(mention);
            }
        }
        accepted
    }
}

impl Recognizer for DictionaryRecognizer {
    fn segment_and_tag(&self, text: &str) -> Vec<TaggedSentence> {
        split_sentences(text)
            .into_iter()
            .map(|sentence| TaggedSentence {
                text: sentence.to_string(),
                entities: self.tag(sentence),
            })
            .collect()
    }
}

/// Alternation of all terms, longest first so the leftmost match is also the longest.
fn term_matcher(terms: &[String]) -> Result<Option<Regex>> {
    let mut cleaned: Vec<&str> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    cleaned.dedup();
    let alternation = cleaned
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    let regex = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
        .case_insensitive(true)
        .size_limit(64 << 20)
        .build()
        .context("compile lexicon matcher")?;
    Ok(Some(regex))
}

static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["')\]]*\s+"#).expect("valid regex"));

/// Split text into trimmed sentences at terminal punctuation followed by
/// whitespace. A boundary followed by a lowercase letter is not a split
/// point, which keeps abbreviations such as "e.g. aspirin" intact.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        let next = text[boundary.end()..].chars().next();
        if next.is_some_and(char::is_lowercase) {
            continue;
        }
        let end = boundary.start() + boundary.as_str().trim_end().len();
        push_trimmed(&mut sentences, &text[start..end]);
        start = boundary.end();
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, fragment: &'a str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        sentences.push(fragment);
    }
}

/// Build the dictionary recogniser from a lexicon file, or the built-in
/// lexicon when no path is given.
pub fn load_recognizer(lexicon_path: Option<&Path>) -> Result<Arc<dyn Recognizer>> {
    let lexicon = match lexicon_path {
        Some(path) => Lexicon::from_path(path)?,
        None => Lexicon::builtin(),
    };
    let source = lexicon_path.map_or_else(|| "builtin".to_string(), |p| p.display().to_string());
    info!(
        %source,
        chemicals = lexicon.chemical.len(),
        diseases = lexicon.disease.len(),
        "loaded recognizer lexicon"
    );
    Ok(Arc::new(DictionaryRecognizer::new(&lexicon)?) as Arc<dyn Recognizer>)
}
