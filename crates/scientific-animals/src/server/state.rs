//! Application state for the HTTP server

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::pipeline::AnswerPipeline;

/// Shared application state
///
/// Holds only the stateless pipeline; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<AnswerPipeline>,
}

impl AppState {
    /// Build state with the real external providers
    pub fn new(config: &AppConfig) -> Result<Self> {
        tracing::info!("Initializing answer pipeline...");
        let pipeline = AnswerPipeline::from_config(config)?;
        Ok(Self::with_pipeline(pipeline))
    }

    /// Build state around an already assembled pipeline
    pub fn with_pipeline(pipeline: AnswerPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn pipeline(&self) -> &AnswerPipeline {
        &self.pipeline
    }
}
