//! Ephemeral similarity search over chunk embeddings

mod index;

pub use index::{cosine_similarity, InMemoryIndex, SearchResult};
