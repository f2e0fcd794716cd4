//! Loaded documents and the chunks cut from them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// External source a document was loaded from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// General-knowledge encyclopedia
    Wikipedia,
    /// Scientific-literature repository
    Arxiv,
}

impl SourceKind {
    /// Source name for logging and errors
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wikipedia => "wikipedia",
            Self::Arxiv => "arxiv",
        }
    }
}

/// A document loaded from an external source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: Uuid,
    /// Where the document came from
    pub source: SourceKind,
    /// Page or paper title
    pub title: String,
    /// Canonical URL
    pub url: String,
    /// Raw text; the only field the pipeline interprets
    pub content: String,
    /// Short summary (page intro or paper abstract)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Paper authors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Publication date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<NaiveDate>,
}

impl Document {
    /// Create a document with only the required fields set
    pub fn new(
        source: SourceKind,
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            title: title.into(),
            url: url.into(),
            content: content.into(),
            summary: None,
            authors: Vec::new(),
            published: None,
        }
    }
}

/// A bounded window of a document's text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier
    pub id: Uuid,
    /// Owning document
    pub document_id: Uuid,
    /// Source of the owning document
    pub source: SourceKind,
    /// Title of the owning document
    pub title: String,
    /// Window text
    pub content: String,
    /// Grapheme offset of the window within the document
    pub offset: usize,
    /// Position of the window within the document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a chunk of `document`
    pub fn new(document: &Document, content: String, offset: usize, chunk_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: document.id,
            source: document.source,
            title: document.title.clone(),
            content,
            offset,
            chunk_index,
        }
    }
}
