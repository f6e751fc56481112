//! PubMed ingestion utilities leveraging E-utilities.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use indexmap::IndexSet;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info};
use urlencoding::encode;

use crate::error::PipelineError;

const EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const ESEARCH_TIMEOUT: Duration = Duration::from_secs(30);
const EFETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Abstract record persisted to JSONL between the fetch and extract stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubRecord {
    #[serde(default)]
    pub pmid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
}

impl PubRecord {
    /// Title and abstract joined by a space, skipping empty parts.
    pub fn combined_text(&self) -> String {
        [self.title.as_str(), self.abstract_text.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Identity and rate-limit parameters attached to every E-utilities request.
#[derive(Debug, Clone)]
pub struct EutilsClient {
    client: Client,
    email: String,
    api_key: Option<String>,
    tool: String,
}

impl EutilsClient {
    pub fn new(email: String, api_key: Option<String>, tool: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("cdr-pipeline/0.1 (+{email})"))
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self {
            client,
            email,
            api_key,
            tool,
        })
    }

    fn identity_params(&self) -> String {
        let mut params = format!(
            "tool={tool}&email={email}",
            tool = encode(&self.tool),
            email = encode(&self.email)
        );
        if let Some(key) = &self.api_key {
            params.push_str("&api_key=");
            params.push_str(&encode(key));
        }
        params
    }

    /// Run an esearch query and return the matching PMIDs.
    pub async fn search(&self, query: &str, retmax: usize) -> Result<Vec<String>> {
        if query.trim().is_empty() {
            return Ok(vec![]);
        }
        let url = format!(
            "{base}/esearch.fcgi?db=pubmed&retmode=json&term={term}&retmax={retmax}&{identity}",
            base = EUTILS_BASE,
            term = encode(query),
            identity = self.identity_params()
        );
        let payload: ESearchResponse = self
            .client
            .get(url)
            .timeout(ESEARCH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        info!(%query, count = payload.esearchresult.idlist.len(), "esearch returned ids");
        Ok(payload.esearchresult.idlist)
    }

    /// Fetch one batch of abstracts via efetch.
    pub async fn fetch_chunk(&self, pmids: &[String]) -> Result<Vec<PubRecord>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!(
            "{base}/efetch.fcgi?db=pubmed&retmode=xml&id={ids}&{identity}",
            base = EUTILS_BASE,
            ids = pmids.join(","),
            identity = self.identity_params()
        );
        let xml = self
            .client
            .get(&url)
            .timeout(EFETCH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_article_set(&xml)
    }

    /// Fetch all PMIDs chunk by chunk, pausing `throttle` after every request.
    ///
    /// Records are handed to `sink` as soon as their chunk arrives.
    pub async fn fetch_records<F>(
        &self,
        pmids: &[String],
        chunk_size: usize,
        throttle: Duration,
        mut sink: F,
    ) -> Result<usize>
    where
        F: FnMut(PubRecord) -> Result<()>,
    {
        if chunk_size == 0 {
            return Err(PipelineError::InvalidChunkSize.into());
        }
        let mut count = 0;
        for (idx, chunk) in pmids.chunks(chunk_size).enumerate() {
            let records = self
                .fetch_chunk(chunk)
                .await
                .with_context(|| format!("efetch chunk {idx}"))?;
            debug!(chunk = idx, requested = chunk.len(), received = records.len(), "fetched chunk");
            for record in records {
                sink(record)?;
                count += 1;
            }
            sleep(throttle).await;
        }
        Ok(count)
    }
}

/// Read a PMID list file: one identifier per line, blank lines ignored.
pub fn read_pmid_file(path: &Path) -> Result<Vec<String>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Drop repeated PMIDs, keeping the first occurrence of each.
pub fn unique_pmids<I>(pmids: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    pmids.into_iter().collect::<IndexSet<_>>().into_iter().collect()
}

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    #[serde(default)]
    esearchresult: ESearchResult,
}

#[derive(Debug, Deserialize, Default)]
struct ESearchResult {
    #[serde(default, rename = "idlist")]
    idlist: Vec<String>,
}

/// Element whose text content is currently being collected.
enum Capture {
    Pmid,
    Title,
    AbstractText { label: Option<String> },
}

#[derive(Default)]
struct ArticleBuilder {
    pmid: Option<String>,
    title: String,
    abstract_parts: Vec<String>,
}

impl ArticleBuilder {
    fn finish(self) -> PubRecord {
        PubRecord {
            pmid: self.pmid.unwrap_or_default(),
            title: self.title.trim().to_string(),
            abstract_text: self
                .abstract_parts
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string(),
        }
    }

    fn push_abstract_part(&mut self, label: Option<String>, text: &str) {
        let text = text.trim();
        self.abstract_parts.push(match label {
            Some(label) => format!("{label}: {text}"),
            None => text.to_string(),
        });
    }
}

/// Parse an efetch `PubmedArticleSet` document into records.
///
/// Inline markup inside titles and abstract sections (`<i>`, `<sup>`, ...)
/// is flattened into plain text.
pub fn parse_article_set(xml: &str) -> Result<Vec<PubRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut article: Option<ArticleBuilder> = None;
    let mut capture: Option<(Capture, usize, String)> = None;
    let mut records = Vec::new();

    loop {
        match reader.read_event().context("parse efetch xml")? {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                path.push(name);
                let depth = path.len();
                if ends_with(&path, &["PubmedArticle"]) {
                    article = Some(ArticleBuilder::default());
                    continue;
                }
                let Some(current) = article.as_ref() else {
                    continue;
                };
                if capture.is_some() {
                    continue;
                }
                if ends_with(&path, &["MedlineCitation", "PMID"]) && current.pmid.is_none() {
                    capture = Some((Capture::Pmid, depth, String::new()));
                } else if ends_with(&path, &["Article", "ArticleTitle"]) {
                    capture = Some((Capture::Title, depth, String::new()));
                } else if ends_with(&path, &["Article", "Abstract", "AbstractText"]) {
                    let label = label_of(&start)?;
                    capture = Some((Capture::AbstractText { label }, depth, String::new()));
                }
            }
            Event::Empty(empty) => {
                // Self-closing sections still contribute their label.
                if capture.is_none()
                    && empty.name().as_ref() == b"AbstractText"
                    && ends_with(&path, &["Article", "Abstract"])
                {
                    if let Some(current) = article.as_mut() {
                        current.push_abstract_part(label_of(&empty)?, "");
                    }
                }
            }
            Event::Text(text) => {
                if let Some((_, _, buf)) = capture.as_mut() {
                    buf.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some((_, _, buf)) = capture.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                let depth = path.len();
                if matches!(&capture, Some((_, at, _)) if *at == depth) {
                    if let (Some((kind, _, buf)), Some(current)) = (capture.take(), article.as_mut())
                    {
                        match kind {
                            Capture::Pmid => current.pmid = Some(buf.trim().to_string()),
                            Capture::Title => current.title.push_str(&buf),
                            Capture::AbstractText { label } => {
                                current.push_abstract_part(label, &buf)
                            }
                        }
                    }
                }
                if ends_with(&path, &["PubmedArticle"]) {
                    if let Some(done) = article.take() {
                        records.push(done.finish());
                    }
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

fn label_of(element: &BytesStart<'_>) -> Result<Option<String>> {
    Ok(match element.try_get_attribute("Label")? {
        Some(attr) => Some(attr.unescape_value()?.into_owned()),
        None => None,
    })
}

fn ends_with(path: &[String], suffix: &[&str]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(have, want)| have == want)
}
