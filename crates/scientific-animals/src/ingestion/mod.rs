//! Document splitting

mod chunker;

pub use chunker::TextSplitter;
