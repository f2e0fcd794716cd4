//! Configuration for the scientific-name service

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_PATH_ENV: &str = "SCIENTIFIC_ANIMALS_CONFIG";

/// Environment variable holding the Hugging Face Hub token
pub const HF_TOKEN_ENV: &str = "HUGGINGFACEHUB_API_TOKEN";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Document source configuration
    pub sources: SourcesConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Hosted LLM configuration
    pub llm: LlmConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
}

impl AppConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load configuration from the file named by `SCIENTIFIC_ANIMALS_CONFIG`,
    /// falling back to defaults, then apply environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if config.llm.api_token.is_none() {
            config.llm.api_token = std::env::var(HF_TOKEN_ENV).ok().filter(|t| !t.is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.embeddings.batch_size == 0 {
            return Err(Error::Config("batch_size must be greater than 0".to_string()));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("top_k must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Document source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// General-knowledge source
    pub wikipedia: WikipediaConfig,
    /// Scientific-literature source
    pub arxiv: ArxivConfig,
}

/// Wikipedia source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikipediaConfig {
    /// Base URL; `{lang}` is replaced with the language code
    pub base_url: String,
    /// Wikipedia language edition
    pub lang: String,
    /// Maximum number of pages to load
    pub max_docs: usize,
    /// Page text is truncated to this many characters
    pub max_chars: usize,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://{lang}.wikipedia.org".to_string(),
            lang: "en".to_string(),
            max_docs: 25,
            max_chars: 4000,
        }
    }
}

impl WikipediaConfig {
    /// Endpoint of the MediaWiki action API
    pub fn api_url(&self) -> String {
        format!(
            "{}/w/api.php",
            self.base_url.replace("{lang}", &self.lang).trim_end_matches('/')
        )
    }
}

/// arXiv source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArxivConfig {
    /// Atom query API endpoint
    pub api_url: String,
    /// Maximum number of papers to load
    pub max_docs: usize,
    /// Paper text is truncated to this many characters
    pub max_chars: usize,
    /// Download PDFs and extract their text instead of using the abstract
    pub full_text: bool,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_url: "http://export.arxiv.org/api/query".to_string(),
            max_docs: 2,
            max_chars: 4000,
            full_text: true,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,
    /// Characters shared between neighbouring chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 64,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Hugging Face model id
    pub model: String,
    /// Embedding dimensions (384 for MiniLM)
    pub dimensions: usize,
    /// Texts sent per feature-extraction request
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
            batch_size: 32,
        }
    }
}

/// Hosted LLM (Hugging Face Inference API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Inference API base URL; model ids are appended to it
    pub base_url: String,
    /// Generation model id
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum generated length
    pub max_length: u32,
    /// Request timeout in seconds, shared by every outbound client
    pub timeout_secs: u64,
    /// Hub token; read from `HUGGINGFACEHUB_API_TOKEN` when unset
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.huggingface.co/hf-inference/models".to_string(),
            generate_model: "google/flan-t5-base".to_string(),
            temperature: 0.2,
            max_length: 256,
            timeout_secs: 120,
            api_token: None,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the LLM
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}
