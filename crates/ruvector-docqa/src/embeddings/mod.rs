//! Text embedding providers
//!
//! Every provider maps text to a fixed-length vector and is deterministic
//! for identical input.

pub mod hashing;
pub mod ollama;
pub mod onnx_embedder;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{EmbeddingBackend, EmbeddingConfig};
use crate::error::Result;
use crate::generation::OllamaClient;

pub use hashing::HashingEmbedder;
pub use ollama::OllamaEmbedder;
pub use onnx_embedder::OnnxEmbedder;

/// Trait for generating text embeddings
///
/// Implementations:
/// - `OnnxEmbedder`: all-MiniLM-L6-v2 through ONNX Runtime
/// - `OllamaEmbedder`: Local Ollama server (nomic-embed-text)
/// - `HashingEmbedder`: feature hashing, offline
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts (batch)
    ///
    /// Default implementation calls `embed` sequentially.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Build the embedder selected by `config.backend`
pub async fn build_embedder(
    config: &EmbeddingConfig,
    ollama: Arc<OllamaClient>,
) -> Result<Arc<dyn EmbeddingProvider>> {
    let embedder: Arc<dyn EmbeddingProvider> = match config.backend {
        EmbeddingBackend::Onnx => Arc::new(OnnxEmbedder::new(config).await?),
        EmbeddingBackend::Ollama => Arc::new(OllamaEmbedder::new(ollama, config.dimensions)),
        EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(config.dimensions)),
    };

    tracing::info!(
        "Embedding provider '{}' ready ({} dimensions)",
        embedder.name(),
        embedder.dimensions()
    );

    Ok(embedder)
}

/// Compute cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Scale `v` to unit length in place; zero vectors are left alone
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for val in v.iter_mut() {
            *val /= norm;
        }
    }
}
