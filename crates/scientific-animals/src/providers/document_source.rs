//! Document source trait for loading text about an animal

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Document, SourceKind};

/// Trait for external document sources
///
/// Implementations:
/// - `WikipediaSource`: MediaWiki search + plain-text extracts
/// - `ArxivSource`: arXiv Atom API, optionally with PDF text
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Load documents matching `query`
    async fn load(&self, query: &str) -> Result<Vec<Document>>;

    /// Which source this is
    fn kind(&self) -> SourceKind;

    /// Get provider name for logging
    fn name(&self) -> &str {
        self.kind().as_str()
    }
}
