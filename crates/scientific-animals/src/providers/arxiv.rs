//! arXiv document source
//!
//! Queries the arXiv Atom API and, when full text is enabled, downloads each
//! paper's PDF and extracts its text.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::ArxivConfig;
use crate::error::{Error, Result};
use crate::types::{Document, SourceKind};

use super::document_source::DocumentSource;
use super::{truncate_chars, MAX_QUERY_CHARS};

/// Scientific-literature source backed by arXiv
pub struct ArxivSource {
    client: reqwest::Client,
    api_url: String,
    max_docs: usize,
    max_chars: usize,
    full_text: bool,
}

/// One `<entry>` of the Atom feed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ArxivEntry {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub authors: Vec<String>,
    pub published: Option<NaiveDate>,
    pub pdf_url: Option<String>,
}

impl ArxivEntry {
    /// PDF link, derived from the abstract URL when the feed has none
    pub fn pdf_url(&self) -> String {
        self.pdf_url
            .clone()
            .unwrap_or_else(|| self.id.replacen("/abs/", "/pdf/", 1))
    }
}

#[derive(Clone, Copy)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
    AuthorName,
}

fn xml_error(e: impl std::fmt::Display) -> Error {
    Error::document_source(SourceKind::Arxiv.as_str(), format!("Malformed Atom feed: {}", e))
}

/// Collapse the line breaks arXiv puts into titles and abstracts
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn pdf_link(element: &BytesStart<'_>) -> Result<Option<String>> {
    let mut href = None;
    let mut is_pdf = false;

    for attr in element.attributes() {
        let attr = attr.map_err(xml_error)?;
        let value = attr.unescape_value().map_err(xml_error)?;
        match attr.key.as_ref() {
            b"href" => href = Some(value.into_owned()),
            b"title" if value == "pdf" => is_pdf = true,
            b"type" if value == "application/pdf" => is_pdf = true,
            _ => {}
        }
    }

    Ok(if is_pdf { href } else { None })
}

/// Parse an arXiv Atom feed into entries
pub fn parse_feed(xml: &str) -> Result<Vec<ArxivEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<ArxivEntry> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match (e.local_name().as_ref(), current.is_some()) {
                (b"entry", _) => current = Some(ArxivEntry::default()),
                (b"id", true) => field = Some(Field::Id),
                (b"title", true) => field = Some(Field::Title),
                (b"summary", true) => field = Some(Field::Summary),
                (b"published", true) => field = Some(Field::Published),
                (b"name", true) => field = Some(Field::AuthorName),
                (b"link", true) => {
                    if let (Some(entry), Some(href)) = (current.as_mut(), pdf_link(&e)?) {
                        entry.pdf_url = Some(href);
                    }
                }
                _ => {}
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"link" {
                    if let (Some(entry), Some(href)) = (current.as_mut(), pdf_link(&e)?) {
                        entry.pdf_url = Some(href);
                    }
                }
            }
            Event::Text(t) => {
                if field.is_some() {
                    text.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"entry" {
                    entries.extend(current.take());
                } else if let (Some(f), Some(entry)) = (field.take(), current.as_mut()) {
                    let value = normalize_whitespace(&text);
                    match f {
                        Field::Id => entry.id = value,
                        Field::Title => entry.title = value,
                        Field::Summary => entry.summary = value,
                        Field::Published => {
                            entry.published = DateTime::parse_from_rfc3339(&value)
                                .ok()
                                .map(|dt| dt.date_naive());
                        }
                        Field::AuthorName => entry.authors.push(value),
                    }
                }
                text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

/// Run a CPU-bound text extractor on the blocking pool
///
/// Extraction failures, empty output and extractor panics all yield `None`.
/// Requires `panic = "unwind"`; under abort an extractor panic ends the process.
async fn extract_off_runtime<F, E>(url: &str, extract: F) -> Option<String>
where
    F: FnOnce() -> std::result::Result<String, E> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    match tokio::task::spawn_blocking(extract).await {
        Ok(Ok(text)) if !text.trim().is_empty() => Some(text),
        Ok(Ok(_)) => {
            tracing::warn!("PDF {} has no extractable text", url);
            None
        }
        Ok(Err(e)) => {
            tracing::warn!("Failed to extract text from {}: {}", url, e);
            None
        }
        Err(e) => {
            tracing::warn!("PDF extraction task for {} panicked: {}", url, e);
            None
        }
    }
}

impl ArxivSource {
    /// Create a new source sharing `client`
    pub fn new(client: reqwest::Client, config: &ArxivConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            max_docs: config.max_docs,
            max_chars: config.max_chars,
            full_text: config.full_text,
        }
    }

    fn error(message: impl Into<String>) -> Error {
        Error::document_source(SourceKind::Arxiv.as_str(), message)
    }

    async fn search(&self, query: &str) -> Result<Vec<ArxivEntry>> {
        let query = truncate_chars(query, MAX_QUERY_CHARS);
        let max_results = self.max_docs.to_string();

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("search_query", query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Self::error(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error(format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Self::error(format!("Failed to read feed: {}", e)))?;

        let mut entries = parse_feed(&body)?;
        // arXiv reports query errors as an entry titled "Error"
        entries.retain(|e| !e.id.is_empty() && e.title != "Error");
        entries.truncate(self.max_docs);
        Ok(entries)
    }

    /// Download a paper's PDF and extract its text
    ///
    /// Returns `None` when the PDF cannot be parsed; transport failures are errors.
    async fn fetch_pdf_text(&self, url: &str) -> Result<Option<String>> {
        tracing::debug!("Downloading arXiv PDF {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::error(format!("PDF download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error(format!("PDF download failed: HTTP {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::error(format!("PDF download failed: {}", e)))?;

        Ok(extract_off_runtime(url, move || pdf_extract::extract_text_from_mem(&bytes)).await)
    }

    async fn entry_to_document(&self, entry: ArxivEntry) -> Result<Document> {
        let full_text = if self.full_text {
            self.fetch_pdf_text(&entry.pdf_url()).await?
        } else {
            None
        };

        let content = full_text.unwrap_or_else(|| entry.summary.clone());

        let mut doc = Document::new(
            SourceKind::Arxiv,
            entry.title,
            entry.id,
            truncate_chars(&content, self.max_chars),
        );
        doc.summary = Some(entry.summary);
        doc.authors = entry.authors;
        doc.published = entry.published;
        Ok(doc)
    }
}

#[async_trait]
impl DocumentSource for ArxivSource {
    async fn load(&self, query: &str) -> Result<Vec<Document>> {
        let entries = self.search(query).await?;
        tracing::debug!("arXiv search for {:?} returned {} entries", query, entries.len());

        let mut documents = Vec::with_capacity(entries.len());
        for entry in entries {
            documents.push(self.entry_to_document(entry).await?);
        }

        tracing::info!("Loaded {} arXiv documents for {:?}", documents.len(), query);
        Ok(documents)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Arxiv
    }
}
