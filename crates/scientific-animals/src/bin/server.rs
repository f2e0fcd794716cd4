//! Scientific-name server binary
//!
//! Run with: cargo run -p scientific-animals --bin scientific-animals-server

use scientific_animals::{config::AppConfig, server::ScientificNameServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scientific_animals=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    if config.llm.api_token.is_none() {
        tracing::warn!("HUGGINGFACEHUB_API_TOKEN is not set; Inference API calls may be rejected");
    }

    let server = ScientificNameServer::new(config)?;

    tracing::info!("Endpoints:");
    tracing::info!("  POST /scientific-name - Ask for an animal's scientific name");
    tracing::info!("  GET  /health          - Liveness check");

    server.start().await?;

    Ok(())
}
