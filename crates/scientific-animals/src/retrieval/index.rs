//! Brute-force cosine index, rebuilt for every request

use crate::error::{Error, Result};
use crate::types::Chunk;

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (-1.0 to 1.0, higher is better)
    pub similarity: f32,
}

/// Cosine similarity of two equal-length vectors; 0.0 when either is all zeros
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// In-memory index over chunk embeddings
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    entries: Vec<(Chunk, Vec<f32>)>,
    dimensions: usize,
}

impl InMemoryIndex {
    /// Build an index from chunks and their embeddings (same order)
    pub fn from_chunks(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(Error::index(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dimensions) {
            return Err(Error::index(format!(
                "Mixed embedding dimensions: {} and {}",
                dimensions,
                bad.len()
            )));
        }

        Ok(Self {
            entries: chunks.into_iter().zip(embeddings).collect(),
            dimensions,
        })
    }

    /// Return up to `k` chunks ordered by descending similarity to `query`
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(Error::index(format!(
                "Query has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                similarity: cosine_similarity(query, embedding),
            })
            .collect();

        // Stable sort keeps insertion order between equal scores
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}
