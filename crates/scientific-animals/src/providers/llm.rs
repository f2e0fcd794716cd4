//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::error::Result;

/// Trait for hosted text generation
///
/// Implementations:
/// - `HuggingFaceLlm`: Hugging Face Inference API (flan-t5-base)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a fully built prompt; the output is returned as-is
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
