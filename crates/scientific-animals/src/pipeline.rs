//! Answer pipeline: load, split, embed/index, generate
//!
//! Every call rebuilds everything from scratch; nothing survives between
//! requests.

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::ingestion::TextSplitter;
use crate::providers::{
    ArxivSource, DocumentSource, EmbeddingProvider, HuggingFaceClient, HuggingFaceEmbedder,
    HuggingFaceLlm, LlmProvider, WikipediaSource,
};
use crate::retrieval::InMemoryIndex;
use crate::types::{Chunk, Document};

/// Pull the animal name back out of a generated question
///
/// Takes the text after the last occurrence of `animal` (the whole question
/// when the word is absent) and strips surrounding spaces and question marks.
/// Other whitespace is left alone.
pub fn extract_animal(question: &str) -> &str {
    let tail = match question.rfind("animal") {
        Some(pos) => &question[pos + "animal".len()..],
        None => question,
    };
    tail.trim_matches(|c| c == ' ' || c == '?')
}

/// Sequential RAG pipeline over two document sources
pub struct AnswerPipeline {
    general: Arc<dyn DocumentSource>,
    literature: Arc<dyn DocumentSource>,
    splitter: TextSplitter,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl AnswerPipeline {
    /// Assemble a pipeline from explicit collaborators
    pub fn new(
        general: Arc<dyn DocumentSource>,
        literature: Arc<dyn DocumentSource>,
        splitter: TextSplitter,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            general,
            literature,
            splitter,
            embedder,
            llm,
            top_k,
        }
    }

    /// Wire up Wikipedia, arXiv and the Hugging Face providers from config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let http = crate::providers::http_client(config.llm.timeout_secs)?;
        let hf = Arc::new(HuggingFaceClient::new(&config.llm)?);

        Ok(Self::new(
            Arc::new(WikipediaSource::new(http.clone(), &config.sources.wikipedia)),
            Arc::new(ArxivSource::new(http, &config.sources.arxiv)),
            TextSplitter::from_config(&config.chunking),
            Arc::new(HuggingFaceEmbedder::from_client(Arc::clone(&hf), &config.embeddings)),
            Arc::new(HuggingFaceLlm::from_client(hf, &config.llm)),
            config.retrieval.top_k,
        ))
    }

    /// Step 1: general-knowledge documents first, then literature
    pub async fn load_documents(&self, animal: &str) -> Result<Vec<Document>> {
        let mut documents = self.general.load(animal).await?;
        documents.extend(self.literature.load(animal).await?);
        Ok(documents)
    }

    /// Step 2
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        self.splitter.split_documents(documents)
    }

    /// Step 3
    pub async fn build_index(&self, chunks: Vec<Chunk>) -> Result<InMemoryIndex> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        let index = InMemoryIndex::from_chunks(chunks, embeddings)?;

        if !index.is_empty() && index.dimensions() != self.embedder.dimensions() {
            return Err(Error::index(format!(
                "{} returned {} dimensions, expected {}",
                self.embedder.name(),
                index.dimensions(),
                self.embedder.dimensions()
            )));
        }
        Ok(index)
    }

    /// Step 4: retrieve context for `question` and ask the LLM
    pub async fn generate_answer(&self, question: &str, index: &InMemoryIndex) -> Result<String> {
        let query_embedding = self.embedder.embed(question).await?;
        let results = index.search(&query_embedding, self.top_k)?;
        tracing::debug!("Retrieved {} chunks for the prompt", results.len());

        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_qa_prompt(question, &context);
        self.llm.generate(&prompt).await
    }

    /// Answer `question`, returning the model output unmodified
    pub async fn get_scientific_name(&self, question: &str) -> Result<String> {
        let start = Instant::now();

        let animal = extract_animal(question);
        if animal.is_empty() {
            return Err(Error::EmptyAnimal(question.to_string()));
        }
        tracing::info!("Answering for animal {:?}", animal);

        let documents = self.load_documents(animal).await?;
        tracing::info!(
            "Loaded {} documents ({} + {})",
            documents.len(),
            self.general.name(),
            self.literature.name()
        );

        let chunks = self.split_documents(&documents);
        tracing::info!("Split into {} chunks", chunks.len());

        let index = self.build_index(chunks).await?;
        tracing::info!(
            "Indexed {} chunks with {} ({} dims)",
            index.len(),
            self.embedder.name(),
            index.dimensions()
        );

        let answer = self.generate_answer(question, &index).await?;

        tracing::info!(
            "Answer from {}:{} in {}ms",
            self.llm.name(),
            self.llm.model(),
            start.elapsed().as_millis()
        );

        Ok(answer)
    }
}
