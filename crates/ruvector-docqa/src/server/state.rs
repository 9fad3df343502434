//! Application state for the document QA server

use std::sync::Arc;

use crate::config::{EntityBackend, RagConfig};
use crate::embeddings::{build_embedder, EmbeddingProvider};
use crate::error::Result;
use crate::generation::{AnswerGenerator, LlmProvider, OllamaClient, OllamaLlm};
use crate::nlu::{EntityRecognizer, IntentAnalyzer, OllamaEntityRecognizer, PatternEntityRecognizer};
use crate::retrieval::VectorStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Chunk store
    vector_store: Arc<VectorStore>,
    /// Prompt assembly and generation
    generator: AnswerGenerator,
    /// Question classification and entity extraction
    analyzer: IntentAnalyzer,
    /// Embedding backend shared by the store and the analyzer
    embedder: Arc<dyn EmbeddingProvider>,
}

impl AppState {
    /// Create application state with the backends selected in `config`
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing document QA state...");

        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        tracing::info!(
            "Ollama client initialized ({} at {})",
            config.llm.generate_model,
            config.llm.base_url
        );

        let embedder = build_embedder(&config.embeddings, Arc::clone(&ollama)).await?;
        let llm: Arc<dyn LlmProvider> = Arc::new(OllamaLlm::from_client(Arc::clone(&ollama)));
        let recognizer: Arc<dyn EntityRecognizer> = match config.nlu.entity_backend {
            EntityBackend::Pattern => Arc::new(PatternEntityRecognizer::new()),
            EntityBackend::Ollama => Arc::new(OllamaEntityRecognizer::new(ollama)),
        };

        Self::from_parts(config, embedder, llm, recognizer)
    }

    /// Assemble state from already-built services
    pub fn from_parts(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Result<Self> {
        let vector_store = Arc::new(VectorStore::new(&config.vector_db, Arc::clone(&embedder))?);
        let generator = AnswerGenerator::new(llm, config.generation.clone());
        let analyzer = IntentAnalyzer::new(Arc::clone(&embedder), recognizer, config.nlu.clone());

        tracing::info!("Document QA state ready");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                vector_store,
                generator,
                analyzer,
                embedder,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get vector store
    pub fn vector_store(&self) -> &Arc<VectorStore> {
        &self.inner.vector_store
    }

    /// Get answer generator
    pub fn generator(&self) -> &AnswerGenerator {
        &self.inner.generator
    }

    /// Get intent analyzer
    pub fn analyzer(&self) -> &IntentAnalyzer {
        &self.inner.analyzer
    }

    /// Whether /query runs intent analysis
    pub fn nlu_enabled(&self) -> bool {
        self.inner.config.nlu.enabled
    }

    /// Check that the embedder answers and the vector index is readable
    pub async fn is_ready(&self) -> bool {
        let embedder = &self.inner.embedder;
        match embedder.health_check().await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("Embedding provider '{}' is unavailable", embedder.name());
                return false;
            }
            Err(e) => {
                tracing::warn!("Embedding provider '{}' health check failed: {}", embedder.name(), e);
                return false;
            }
        }

        if let Err(e) = self.inner.vector_store.stored_vectors() {
            tracing::warn!("Vector index is unavailable: {}", e);
            return false;
        }
        true
    }
}
