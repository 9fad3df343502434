//! Configuration for the document QA service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Largest accepted `llm.max_retries`
pub const MAX_LLM_RETRIES: u32 = 10;

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Vector database configuration
    pub vector_db: VectorDbConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Answer generation configuration
    pub generation: GenerationConfig,
    /// Intent analysis configuration
    pub nlu: NluConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file. Missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.embeddings.dimensions == 0 {
            return Err(Error::Config("embeddings.dimensions must be > 0".to_string()));
        }
        if self.embeddings.batch_size == 0 {
            return Err(Error::Config("embeddings.batch_size must be > 0".to_string()));
        }
        if self.nlu.enabled && self.nlu.candidate_labels.is_empty() {
            return Err(Error::Config(
                "nlu.candidate_labels must not be empty when nlu is enabled".to_string(),
            ));
        }
        if !self.nlu.hypothesis_template.contains("{}") {
            return Err(Error::Config(
                "nlu.hypothesis_template must contain a {} placeholder".to_string(),
            ));
        }
        if self.nlu.temperature <= 0.0 {
            return Err(Error::Config("nlu.temperature must be > 0".to_string()));
        }
        if self.llm.max_retries > MAX_LLM_RETRIES {
            return Err(Error::Config(format!(
                "llm.max_retries must be at most {}",
                MAX_LLM_RETRIES
            )));
        }
        if !self.server.api_prefix.starts_with('/') {
            return Err(Error::Config("server.api_prefix must start with '/'".to_string()));
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
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
    /// Prefix all API routes are nested under
    pub api_prefix: String,
    /// Directory for temporary upload files (system temp dir when unset)
    pub upload_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
            api_prefix: "/api/v1".to_string(),
            upload_dir: None,
        }
    }
}

/// Which embedding implementation to run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Local ONNX Runtime sentence-transformer
    #[default]
    Onnx,
    /// Ollama embeddings endpoint
    Ollama,
    /// Deterministic feature hashing, no model required
    Hashing,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding implementation
    pub backend: EmbeddingBackend,
    /// Model to use (default: all-MiniLM-L6-v2)
    pub model: String,
    /// Embedding dimensions (384 for MiniLM, 768 for larger models)
    pub dimensions: usize,
    /// Batch size for embedding generation
    pub batch_size: usize,
    /// Maximum sequence length
    pub max_length: usize,
    /// Cache directory for models
    pub cache_dir: PathBuf,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Onnx,
            model: "all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
            batch_size: 32,
            max_length: 256,
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ruvector-docqa")
                .join("models"),
        }
    }
}

/// What an upload does to previously stored chunks
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreScope {
    /// Every upload replaces the whole store: one document per session
    #[default]
    Session,
    /// Uploads accumulate into a multi-document corpus
    Corpus,
}

/// Vector database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    /// Storage path for the vector database
    pub storage_path: PathBuf,
    /// Replace-on-add or append-on-add
    pub scope: StoreScope,
    /// HNSW M parameter (connections per layer)
    pub hnsw_m: usize,
    /// HNSW ef_construction parameter
    pub hnsw_ef_construction: usize,
    /// HNSW ef_search parameter
    pub hnsw_ef_search: usize,
}

impl VectorDbConfig {
    /// Config rooted in `dir`, used by tests and ad-hoc runs
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            storage_path: dir.as_ref().join("vectors.db"),
            ..Self::default()
        }
    }

    /// Location of the live-document manifest kept next to the database
    pub fn manifest_path(&self) -> PathBuf {
        self.storage_path.with_file_name("manifest.json")
    }
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        // Use absolute path to avoid path traversal detection
        let storage_path = dirs::data_local_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")))
            .join("ruvector-docqa")
            .join("vectors.db");

        Self {
            storage_path,
            scope: StoreScope::Session,
            hnsw_m: 32,
            hnsw_ef_construction: 200,
            hnsw_ef_search: 100,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name (used when embeddings.backend = "ollama")
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "phi3".to_string(),
            timeout_secs: 120,
            max_retries: 0,
        }
    }
}

/// Answer generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Upper bound on generated tokens
    pub max_length: u32,
    /// Sampling temperature; 0.0 is greedy
    pub temperature: f32,
    /// Generation stops at the first of these sequences
    pub stop: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: 200,
            temperature: 0.0,
            stop: vec!["\nquestion:".to_string()],
        }
    }
}

/// Named-entity recogniser selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityBackend {
    /// Regex word-group recogniser
    #[default]
    Pattern,
    /// LLM extraction through Ollama
    Ollama,
}

/// Intent analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NluConfig {
    /// Run intent analysis on /query
    pub enabled: bool,
    /// Zero-shot candidate labels
    pub candidate_labels: Vec<String>,
    /// Hypothesis each label is phrased into before embedding
    pub hypothesis_template: String,
    /// Softmax temperature over label similarities
    pub temperature: f32,
    /// Entity recogniser
    pub entity_backend: EntityBackend,
}

impl Default for NluConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            candidate_labels: ["factoid", "definition", "list", "yes/no", "reasoning", "other"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hypothesis_template: "This question is a {} question.".to_string(),
            temperature: 0.1,
            entity_backend: EntityBackend::Pattern,
        }
    }
}
