//! HTTP server for the scientific-name service

pub mod routes;
pub mod state;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Request bodies only ever carry an animal name
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Scientific-name HTTP server
pub struct ScientificNameServer {
    config: AppConfig,
    state: AppState,
}

impl ScientificNameServer {
    /// Create a new server with the real external providers
    pub fn new(config: AppConfig) -> Result<Self> {
        let state = AppState::new(&config)?;
        Ok(Self { config, state })
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .merge(routes::api_routes())
            .with_state(self.state.clone())
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until the process stops
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        tracing::info!("Starting scientific-name server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
