//! Provider abstractions for document sources, embeddings and the LLM
//!
//! Each external collaborator sits behind a trait so the pipeline can be
//! driven against real services or test doubles.

pub mod arxiv;
pub mod document_source;
pub mod embedding;
pub mod huggingface;
pub mod llm;
pub mod wikipedia;

pub use arxiv::ArxivSource;
pub use document_source::DocumentSource;
pub use embedding::EmbeddingProvider;
pub use huggingface::{HuggingFaceClient, HuggingFaceEmbedder, HuggingFaceLlm};
pub use llm::LlmProvider;
pub use wikipedia::WikipediaSource;

use std::time::Duration;

use crate::error::Result;

/// Search queries longer than this are cut before being sent upstream
pub(crate) const MAX_QUERY_CHARS: usize = 300;

/// Build the shared outbound HTTP client
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("scientific-animals/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Truncate text to at most `max_chars` characters
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Panthera leo", 8), "Panthera");
        assert_eq!(truncate_chars("lion", 10), "lion");
        assert_eq!(truncate_chars("éléphant", 3), "élé");
    }
}
