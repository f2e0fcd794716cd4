//! scientific-animals: scientific names of animals via retrieval-augmented generation
//!
//! Each request loads Wikipedia pages and arXiv papers about the animal,
//! splits them into overlapping windows, embeds and indexes the windows, and
//! asks a hosted language model for the answer using the best matches as
//! context.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use pipeline::{extract_animal, AnswerPipeline};
pub use server::ScientificNameServer;
pub use types::{Chunk, Document, ScientificNameRequest, ScientificNameResponse, SourceKind};
