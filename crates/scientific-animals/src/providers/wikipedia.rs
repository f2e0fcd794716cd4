//! Wikipedia document source
//!
//! Uses the MediaWiki action API: one `list=search` request for page titles,
//! then one `prop=extracts` request per title for its plain text.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};

use crate::config::WikipediaConfig;
use crate::error::{Error, Result};
use crate::types::{Document, SourceKind};

use super::document_source::DocumentSource;
use super::{truncate_chars, MAX_QUERY_CHARS};

/// General-knowledge source backed by Wikipedia
pub struct WikipediaSource {
    client: reqwest::Client,
    api_url: String,
    max_docs: usize,
    max_chars: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct PageResponse {
    query: PageQuery,
}

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    fullurl: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: HashMap<String, serde_json::Value>,
}

impl Page {
    fn is_disambiguation(&self) -> bool {
        self.pageprops.contains_key("disambiguation")
    }
}

impl WikipediaSource {
    /// Create a new source sharing `client`
    pub fn new(client: reqwest::Client, config: &WikipediaConfig) -> Self {
        Self {
            client,
            api_url: config.api_url(),
            max_docs: config.max_docs,
            max_chars: config.max_chars,
        }
    }

    fn error(message: impl Into<String>) -> Error {
        Error::document_source(SourceKind::Wikipedia.as_str(), message)
    }

    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .get(&self.api_url)
            .query(params)
            .send()
            .await
            .map_err(|e| Self::error(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error(format!("HTTP {}", response.status())));
        }

        response
            .json()
            .await
            .map_err(|e| Self::error(format!("Failed to parse response: {}", e)))
    }

    /// Find up to `max_docs` page titles matching `query`
    async fn search_titles(&self, query: &str) -> Result<Vec<String>> {
        let query = truncate_chars(query, MAX_QUERY_CHARS);
        let limit = self.max_docs.to_string();
        let response: SearchResponse = self
            .get(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query.as_str()),
                ("srlimit", &limit),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .await?;

        Ok(response.query.search.into_iter().map(|hit| hit.title).collect())
    }

    /// Fetch one page as a document
    ///
    /// `None` for missing pages, disambiguation pages and pages without text.
    async fn fetch_page(&self, title: &str) -> Result<Option<Document>> {
        let response: PageResponse = self
            .get(&[
                ("action", "query"),
                ("prop", "extracts|info|pageprops"),
                ("ppprop", "disambiguation"),
                ("explaintext", "1"),
                ("inprop", "url"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .await?;

        let Some(page) = response.query.pages.into_iter().find(|p| !p.missing) else {
            return Ok(None);
        };
        if page.is_disambiguation() {
            return Ok(None);
        }
        let Some(extract) = page.extract.filter(|e| !e.trim().is_empty()) else {
            return Ok(None);
        };

        let url = page
            .fullurl
            .unwrap_or_else(|| format!("https://en.wikipedia.org/wiki/{}", page.title.replace(' ', "_")));
        let summary = extract
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string);

        let mut doc = Document::new(
            SourceKind::Wikipedia,
            page.title,
            url,
            truncate_chars(&extract, self.max_chars),
        );
        doc.summary = summary;
        Ok(Some(doc))
    }
}

#[async_trait]
impl DocumentSource for WikipediaSource {
    async fn load(&self, query: &str) -> Result<Vec<Document>> {
        let titles = self.search_titles(query).await?;
        tracing::debug!("Wikipedia search for {:?} returned {} titles", query, titles.len());

        let mut documents = Vec::with_capacity(titles.len());
        for title in &titles {
            match self.fetch_page(title).await? {
                Some(doc) => documents.push(doc),
                None => tracing::debug!("Skipping Wikipedia page {}", title),
            }
        }

        tracing::info!("Loaded {} Wikipedia documents for {:?}", documents.len(), query);
        Ok(documents)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Wikipedia
    }
}
