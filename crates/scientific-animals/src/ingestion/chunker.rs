//! Fixed-size overlapping text windows

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::types::{Chunk, Document};

/// Splits text into windows of at most `chunk_size` characters, each sharing
/// `overlap` characters with the next one. Characters are extended grapheme
/// clusters so windows never cut a user-perceived character in half.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    /// Maximum window length
    chunk_size: usize,
    /// Characters shared between neighbouring windows
    overlap: usize,
}

impl TextSplitter {
    /// Create a new splitter
    ///
    /// Callers validate `overlap < chunk_size` through
    /// [`AppConfig::validate`](crate::config::AppConfig::validate).
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        debug_assert!(overlap < chunk_size);
        Self { chunk_size, overlap }
    }

    /// Create from config
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split every document, keeping document order
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|doc| self.split_document(doc))
            .collect()
    }

    /// Split one document into chunks
    pub fn split_document(&self, doc: &Document) -> Vec<Chunk> {
        if doc.content.trim().is_empty() {
            return Vec::new();
        }

        self.windows(&doc.content)
            .into_iter()
            .enumerate()
            .map(|(index, (offset, text))| Chunk::new(doc, text, offset, index as u32))
            .collect()
    }

    /// Split text into `(grapheme offset, window)` pairs
    pub fn windows(&self, text: &str) -> Vec<(usize, String)> {
        let graphemes: Vec<&str> = text.graphemes(true).collect();
        if graphemes.is_empty() {
            return Vec::new();
        }

        let stride = self.chunk_size - self.overlap;
        let mut windows = Vec::new();
        let mut start = 0usize;

        loop {
            let end = (start + self.chunk_size).min(graphemes.len());
            windows.push((start, graphemes[start..end].concat()));

            // The window that reaches the end of the text is the last one
            if end == graphemes.len() {
                break;
            }
            start += stride;
        }

        windows
    }
}
