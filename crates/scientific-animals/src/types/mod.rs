//! Core types for the scientific-name service

pub mod document;
pub mod request;
pub mod response;

pub use document::{Chunk, Document, SourceKind};
pub use request::ScientificNameRequest;
pub use response::ScientificNameResponse;
