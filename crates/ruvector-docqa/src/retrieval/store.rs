//! Vector store: embeds chunks, keeps the live document set, answers
//! similarity queries

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::index::{ChunkIndex, SearchResult};
use super::manifest::Manifest;
use crate::config::{StoreScope, VectorDbConfig};
use crate::embeddings::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::types::{Chunk, DocumentRecord, FileType, Metadata};

/// Filename recorded for batches added without one
const UNNAMED_DOCUMENT: &str = "untitled";

/// Chunk store with replace-or-append semantics
///
/// Writers are serialised. New chunks are inserted before the manifest is
/// swapped and superseded chunks are deleted only after it, while queries
/// hold the manifest read lock for the whole search. A query therefore sees
/// exactly one consistent set of documents.
pub struct VectorStore {
    index: Arc<ChunkIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    manifest: RwLock<Manifest>,
    write_lock: Mutex<()>,
    config: VectorDbConfig,
}

impl VectorStore {
    /// Open the store described by `config`, embedding with `embedder`
    pub fn new(config: &VectorDbConfig, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let index = ChunkIndex::open(config, embedder.dimensions())?;
        let manifest = Manifest::load(&config.manifest_path())?;

        tracing::info!(
            "Vector store opened at {} ({} live document(s), scope {:?})",
            config.storage_path.display(),
            manifest.documents.len(),
            config.scope
        );

        Ok(Self {
            index: Arc::new(index),
            embedder,
            manifest: RwLock::new(manifest),
            write_lock: Mutex::new(()),
            config: config.clone(),
        })
    }

    /// Replace-or-append scope in effect
    pub fn scope(&self) -> StoreScope {
        self.config.scope
    }

    /// Add a batch of chunk texts as one unnamed document
    pub async fn add_documents(
        &self,
        texts: Vec<String>,
        metadata: Option<Vec<Metadata>>,
    ) -> Result<DocumentRecord> {
        self.add_named(UNNAMED_DOCUMENT, FileType::Unknown, texts, metadata)
            .await
    }

    /// Add a batch of chunk texts as the document `filename`
    ///
    /// In session scope every previously stored chunk is removed; in corpus
    /// scope the batch is appended. Metadata defaults to
    /// `{"source": "uploaded_document"}` per chunk.
    pub async fn add_named(
        &self,
        filename: &str,
        file_type: FileType,
        texts: Vec<String>,
        metadata: Option<Vec<Metadata>>,
    ) -> Result<DocumentRecord> {
        if texts.is_empty() {
            return Err(Error::EmptyDocument);
        }
        let metadata = match metadata {
            Some(m) if m.len() != texts.len() => {
                return Err(Error::InvalidRequest(format!(
                    "Got {} metadata entries for {} chunks",
                    m.len(),
                    texts.len()
                )));
            }
            Some(m) => m,
            None => vec![Chunk::default_metadata(); texts.len()],
        };

        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Embedder returned {} vectors for {} chunks",
                embeddings.len(),
                texts.len()
            )));
        }

        let mut record = DocumentRecord::new(filename, file_type);
        let chunks: Vec<Chunk> = texts
            .into_iter()
            .zip(metadata)
            .zip(embeddings)
            .enumerate()
            .map(|(i, ((content, meta), embedding))| {
                let mut chunk = Chunk::new(record.id, i as u32, content, meta);
                chunk.embedding = embedding;
                chunk
            })
            .collect();
        record.chunk_ids = chunks.iter().map(|c| c.id.to_string()).collect();
        record.total_chunks = chunks.len() as u32;

        let _writer = self.write_lock.lock().await;

        let index = Arc::clone(&self.index);
        tokio::task::spawn_blocking(move || insert_all(&index, &chunks)).await??;

        let mut next = self.manifest.read().await.clone();
        let superseded: Vec<String> = match self.config.scope {
            StoreScope::Session => next
                .documents
                .drain(..)
                .flat_map(|d| d.chunk_ids)
                .collect(),
            StoreScope::Corpus => Vec::new(),
        };
        next.documents.push(record.clone());

        {
            let mut live = self.manifest.write().await;
            if let Err(e) = next.save(&self.config.manifest_path()).await {
                drop(live);
                self.remove_vectors(record.chunk_ids.clone()).await?;
                return Err(e);
            }
            *live = next;
            // Superseded vectors are outside the live set and never returned
            cleanup_outcome(self.remove_vectors(superseded.clone()).await, 0);
        }

        tracing::info!(
            "Stored '{}' as {} chunk(s), replaced {} chunk(s)",
            record.filename,
            record.total_chunks,
            superseded.len()
        );

        Ok(record)
    }

    /// Texts of the `n_results` chunks most similar to `text`, best first
    pub async fn query(&self, text: &str, n_results: usize) -> Result<Vec<String>> {
        Ok(self
            .query_scored(text, n_results)
            .await?
            .into_iter()
            .map(|r| r.chunk.content)
            .collect())
    }

    /// Like [`VectorStore::query`] but keeps chunks and similarity scores
    pub async fn query_scored(&self, text: &str, n_results: usize) -> Result<Vec<SearchResult>> {
        if n_results == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(text).await?;

        let live = self.manifest.read().await;
        let live_ids = live.live_ids();
        if live_ids.is_empty() {
            return Ok(Vec::new());
        }

        // Never ask for more than exists: k sizes the search buffers
        let n_results = n_results.min(live.chunk_count());
        let stored = self.index.len()?;
        let nodes = stored.saturating_add(self.index.removed_since_open());

        // Vectors outside the live set can occupy result slots; fetch past them
        let stale = nodes.saturating_sub(live.chunk_count());
        let fetch = n_results
            .saturating_add(stale)
            .max(n_results.saturating_mul(2))
            .min(nodes);
        if fetch == 0 {
            return Ok(Vec::new());
        }

        let index = Arc::clone(&self.index);
        let mut hits =
            tokio::task::spawn_blocking(move || index.search(&query_embedding, fetch)).await??;
        drop(live);

        hits.retain(|hit| live_ids.contains(&hit.chunk.document_id));
        hits.truncate(n_results);

        tracing::debug!("Query matched {} chunk(s)", hits.len());
        Ok(hits)
    }

    /// Live documents, in ingestion order
    pub async fn list_documents(&self) -> Vec<DocumentRecord> {
        self.manifest.read().await.documents.clone()
    }

    /// Remove a document and its chunks, returning the number of chunks removed
    pub async fn delete_document(&self, id: &Uuid) -> Result<usize> {
        let _writer = self.write_lock.lock().await;

        let mut next = self.manifest.read().await.clone();
        let position = next
            .documents
            .iter()
            .position(|d| d.id == *id)
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
        let removed = next.documents.remove(position);

        let mut live = self.manifest.write().await;
        next.save(&self.config.manifest_path()).await?;
        *live = next;
        let expected = removed.chunk_ids.len();
        let deleted = cleanup_outcome(self.remove_vectors(removed.chunk_ids).await, expected);

        tracing::info!("Deleted document {} ({} chunk(s))", id, deleted);
        Ok(deleted)
    }

    /// Number of chunks in the live set
    pub async fn len(&self) -> usize {
        self.manifest.read().await.chunk_count()
    }

    /// Number of vectors in the index, live or not
    pub fn stored_vectors(&self) -> Result<usize> {
        self.index.len()
    }

    /// Check if no document is live
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn remove_vectors(&self, ids: Vec<String>) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let index = Arc::clone(&self.index);
        tokio::task::spawn_blocking(move || index.delete(&ids)).await?
    }
}

/// Vector removal after the manifest swap only frees space: a failure is
/// logged and `fallback` reported in place of the deleted count
fn cleanup_outcome(result: Result<usize>, fallback: usize) -> usize {
    match result {
        Ok(deleted) => deleted,
        Err(e) => {
            tracing::warn!("Failed to remove vectors outside the live set: {}", e);
            fallback
        }
    }
}

/// Insert every chunk or none: on failure the chunks already written are removed
fn insert_all(index: &ChunkIndex, chunks: &[Chunk]) -> Result<()> {
    for (i, chunk) in chunks.iter().enumerate() {
        if let Err(e) = index.insert(chunk) {
            let written: Vec<String> = chunks[..i].iter().map(|c| c.id.to_string()).collect();
            if let Err(cleanup) = index.delete(&written) {
                tracing::warn!("Failed to roll back partial insert: {}", cleanup);
            }
            return Err(e);
        }
    }
    Ok(())
}
