//! Error types for the scientific-name service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Literal payload returned when the request does not name an animal
pub const MISSING_ANIMAL_MESSAGE: &str = "Missing 'animal' parameter.";

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Request body absent, not JSON, or without an `animal` key
    #[error("{}", MISSING_ANIMAL_MESSAGE)]
    MissingAnimal,

    /// Nothing left of the question after extracting the animal name
    #[error("No animal name could be extracted from question: {0:?}")]
    EmptyAnimal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wikipedia or arXiv failure
    #[error("Document source '{source_name}' failed: {message}")]
    DocumentSource { source_name: String, message: String },

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Language model error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Similarity index error
    #[error("Index error: {0}")]
    Index(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a document source error
    pub fn document_source(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DocumentSource {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an index error
    pub fn index(message: impl Into<String>) -> Self {
        Self::Index(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Flat payload for requests that never named an animal
        if let Error::MissingAnimal = self {
            let body = Json(json!({ "error": MISSING_ANIMAL_MESSAGE }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, error_type) = match &self {
            Error::MissingAnimal => (StatusCode::BAD_REQUEST, "missing_animal"),
            Error::EmptyAnimal(_) => (StatusCode::UNPROCESSABLE_ENTITY, "empty_animal"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::DocumentSource { .. } => (StatusCode::BAD_GATEWAY, "document_source_error"),
            Error::Embedding(_) => (StatusCode::SERVICE_UNAVAILABLE, "embedding_error"),
            Error::Llm(_) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error"),
            Error::Index(_) => (StatusCode::INTERNAL_SERVER_ERROR, "index_error"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::BAD_GATEWAY, "json_error"),
            Error::Http(_) => (StatusCode::BAD_GATEWAY, "http_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        tracing::error!("Request failed ({}): {}", error_type, self);

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_animal_status() {
        let response = Error::MissingAnimal.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_status_mapping() {
        assert_eq!(
            Error::document_source("wikipedia", "down").into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::llm("quota exceeded").into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            Error::EmptyAnimal("animal?".to_string()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
