//! Chunk index on top of ruvector-core

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use ruvector_core::types::{DbOptions, HnswConfig};
use ruvector_core::{DistanceMetric, SearchQuery as CoreSearchQuery, VectorDB, VectorEntry};

use crate::config::VectorDbConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

/// Search result with chunk and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Similarity score (0.0-1.0, higher is better)
    pub similarity: f32,
}

/// HNSW index of chunk embeddings, chunk text carried in vector metadata
pub struct ChunkIndex {
    db: VectorDB,
    dimensions: usize,
    /// Vectors deleted since open; the HNSW graph keeps their nodes until
    /// it is rebuilt from storage on the next open
    removed: AtomicUsize,
}

impl ChunkIndex {
    /// Open (or create) the index at `config.storage_path`
    pub fn open(config: &VectorDbConfig, dimensions: usize) -> Result<Self> {
        if let Some(parent) = config.storage_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = DbOptions {
            dimensions,
            distance_metric: DistanceMetric::Cosine,
            storage_path: config.storage_path.to_string_lossy().to_string(),
            hnsw_config: Some(HnswConfig {
                m: config.hnsw_m,
                ef_construction: config.hnsw_ef_construction,
                ef_search: config.hnsw_ef_search,
                max_elements: 10_000_000,
            }),
            quantization: None,
        };

        let db = VectorDB::new(options)?;

        Ok(Self {
            db,
            dimensions,
            removed: AtomicUsize::new(0),
        })
    }

    /// Embedding dimensions the index was opened with
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Insert an embedded chunk
    pub fn insert(&self, chunk: &Chunk) -> Result<()> {
        if chunk.embedding.len() != self.dimensions {
            return Err(Error::vector_db(format!(
                "Chunk {} has {} dimensions, index expects {}",
                chunk.id,
                chunk.embedding.len(),
                self.dimensions
            )));
        }

        let entry = VectorEntry {
            id: Some(chunk.id.to_string()),
            vector: chunk.embedding.clone(),
            metadata: Some(chunk.to_vector_metadata()),
        };

        self.db.insert(entry)?;
        Ok(())
    }

    /// Nearest neighbours of `query_embedding`, best first. Entries whose
    /// metadata is not a chunk are skipped.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let results = self
            .db
            .search(CoreSearchQuery {
                vector: query_embedding.to_vec(),
                k,
                filter: None,
                ef_search: None,
            })?;

        let mut hits: Vec<SearchResult> = results
            .into_iter()
            .filter_map(|result| {
                let metadata: &HashMap<String, serde_json::Value> = result.metadata.as_ref()?;
                let chunk = Chunk::from_vector_metadata(&result.id, metadata)?;
                // Cosine distance lies in [0, 2]
                let similarity = 1.0 - result.score.min(2.0) / 2.0;
                Some(SearchResult { chunk, similarity })
            })
            .collect();

        hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Ok(hits)
    }

    /// Delete vectors by id, returning how many existed
    pub fn delete(&self, ids: &[String]) -> Result<usize> {
        let mut deleted = 0;
        for id in ids {
            if self.db.delete(id)? {
                deleted += 1;
            }
        }
        self.removed.fetch_add(deleted, Ordering::Relaxed);
        Ok(deleted)
    }

    /// Number of stored vectors, including ones no longer referenced
    pub fn len(&self) -> Result<usize> {
        Ok(self.db.len()?)
    }

    /// Graph nodes left behind by deletes since open
    pub fn removed_since_open(&self) -> usize {
        self.removed.load(Ordering::Relaxed)
    }

    /// Check if empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
