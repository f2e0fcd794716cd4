//! Hugging Face Inference API providers for embeddings and generation
//!
//! One `HuggingFaceClient` is shared by the embedder and the LLM so both reuse
//! the same connection pool and credentials.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Inference API client (no retries)
pub struct HuggingFaceClient {
    /// HTTP client
    client: reqwest::Client,
    /// Base URL model ids are appended to
    base_url: String,
    /// Bearer token
    api_token: Option<String>,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
    options: InferenceOptions,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct GenerateParameters {
    temperature: f32,
    max_length: u32,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

impl HuggingFaceClient {
    /// Create a new client from LLM configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: super::http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    async fn post<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<reqwest::Response> {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Run feature extraction for a batch of texts
    pub async fn feature_extraction(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/pipeline/feature-extraction", self.model_url(model));
        tracing::debug!("Embedding {} texts via {}", texts.len(), url);

        let request = FeatureExtractionRequest {
            inputs: texts,
            options: InferenceOptions { wait_for_model: true },
        };

        let response = self
            .post(&url, &request)
            .await
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "Embedding failed: HTTP {} - {}",
                status, body
            )));
        }

        let embeddings: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

        if embeddings.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }

    /// Run text generation and return the first generated text
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
        max_length: u32,
    ) -> Result<String> {
        let url = self.model_url(model);
        tracing::info!("Generating answer with model: {}", model);

        let request = GenerateRequest {
            inputs: prompt,
            parameters: GenerateParameters {
                temperature,
                max_length,
            },
            options: InferenceOptions { wait_for_model: true },
        };

        let response = self
            .post(&url, &request)
            .await
            .map_err(|e| Error::llm(format!("Generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "Generation failed: HTTP {} - {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse generation response: {}", e)))?;

        match generated {
            GenerateResponse::One(g) => Ok(g.generated_text),
            GenerateResponse::Many(many) => many
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or_else(|| Error::llm("Generation returned no text")),
        }
    }
}

/// Embedding provider backed by the Inference API feature-extraction pipeline
pub struct HuggingFaceEmbedder {
    client: Arc<HuggingFaceClient>,
    model: String,
    dimensions: usize,
    batch_size: usize,
}

impl HuggingFaceEmbedder {
    /// Create from an existing client
    pub fn from_client(client: Arc<HuggingFaceClient>, config: &EmbeddingConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            dimensions: config.dimensions,
            batch_size: config.batch_size.max(1),
        }
    }

    fn check_dimensions(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Model {} returned {} dimensions, expected {}",
                self.model,
                embedding.len(),
                self.dimensions
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self
            .client
            .feature_extraction(&self.model, &[text.to_string()])
            .await?;
        let embedding = embeddings
            .pop()
            .ok_or_else(|| Error::embedding("Empty embedding response"))?;
        self.check_dimensions(&embedding)?;
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let batch_embeddings = self.client.feature_extraction(&self.model, batch).await?;
            for embedding in &batch_embeddings {
                self.check_dimensions(embedding)?;
            }
            embeddings.extend(batch_embeddings);
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

/// Hosted LLM provider with fixed generation parameters
pub struct HuggingFaceLlm {
    client: Arc<HuggingFaceClient>,
    model: String,
    temperature: f32,
    max_length: u32,
}

impl HuggingFaceLlm {
    /// Create from an existing client
    pub fn from_client(client: Arc<HuggingFaceClient>, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.generate_model.clone(),
            temperature: config.temperature,
            max_length: config.max_length,
        }
    }
}

#[async_trait]
impl LlmProvider for HuggingFaceLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client
            .generate(&self.model, prompt, self.temperature, self.max_length)
            .await
    }

    fn name(&self) -> &str {
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn configs(base_url: String) -> (LlmConfig, EmbeddingConfig) {
        let llm = LlmConfig {
            base_url,
            api_token: Some("hf_test".to_string()),
            ..Default::default()
        };
        let embeddings = EmbeddingConfig {
            dimensions: 3,
            batch_size: 2,
            ..Default::default()
        };
        (llm, embeddings)
    }

    #[tokio::test]
    async fn test_embed_batch_splits_requests() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction")
            .match_header("authorization", "Bearer hf_test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]")
            .expect(2)
            .create_async()
            .await;

        let (llm, embeddings) = configs(server.url());
        let client = Arc::new(HuggingFaceClient::new(&llm).unwrap());
        let embedder = HuggingFaceEmbedder::from_client(client, &embeddings);

        let texts: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let result = embedder.embed_batch(&texts).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.len(), 4);
        assert_eq!(result[2], vec![0.1, 0.2, 0.3]);
        assert_eq!(result[3], vec![0.4, 0.5, 0.6]);
    }

    #[tokio::test]
    async fn test_embed_rejects_wrong_dimensions() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[[0.1, 0.2]]")
            .create_async()
            .await;

        let (llm, embeddings) = configs(server.url());
        let client = Arc::new(HuggingFaceClient::new(&llm).unwrap());
        let embedder = HuggingFaceEmbedder::from_client(client, &embeddings);

        assert!(matches!(embedder.embed("lion").await, Err(Error::Embedding(_))));
    }

    #[tokio::test]
    async fn test_generate_sends_fixed_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/google/flan-t5-base")
            .match_body(Matcher::PartialJson(json!({
                "inputs": "Question: lion?",
                "parameters": { "temperature": 0.2, "max_length": 256 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"generated_text": "Panthera leo"}]"#)
            .create_async()
            .await;

        let (llm_config, _) = configs(server.url());
        let client = Arc::new(HuggingFaceClient::new(&llm_config).unwrap());
        let llm = HuggingFaceLlm::from_client(client, &llm_config);

        let answer = llm.generate("Question: lion?").await.unwrap();

        mock.assert_async().await;
        assert_eq!(answer, "Panthera leo");
        assert_eq!(llm.model(), "google/flan-t5-base");
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/google/flan-t5-base")
            .with_status(429)
            .with_body(r#"{"error": "Rate limit reached"}"#)
            .create_async()
            .await;

        let (llm_config, _) = configs(server.url());
        let client = Arc::new(HuggingFaceClient::new(&llm_config).unwrap());
        let llm = HuggingFaceLlm::from_client(client, &llm_config);

        match llm.generate("prompt").await {
            Err(Error::Llm(message)) => assert!(message.contains("429")),
            other => panic!("expected LLM error, got {:?}", other),
        }
    }
}
