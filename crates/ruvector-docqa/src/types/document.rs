//! Document and chunk types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Free-form metadata attached to a chunk
pub type Metadata = HashMap<String, serde_json::Value>;

/// Metadata key/value given to chunks when the caller supplies none
pub const DEFAULT_SOURCE: &str = "uploaded_document";

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document, one chunk per page
    Pdf,
    /// Plain text file, one chunk
    Txt,
    /// CSV file, one chunk per row
    Csv,
    /// Anything else
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "txt" => Self::Txt,
            "csv" => Self::Csv,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a filename or path
    pub fn from_filename(filename: &str) -> Self {
        std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Txt => "Text File",
            Self::Csv => "CSV",
            Self::Unknown => "Unknown",
        }
    }
}

/// A unit of retrieval: one page, one row, or one whole text file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Random unique identifier
    pub id: Uuid,
    /// Document (upload batch) the chunk came from
    pub document_id: Uuid,
    /// Position inside the document
    pub chunk_index: u32,
    /// Extracted text
    pub content: String,
    /// Caller-supplied or default metadata
    pub metadata: Metadata,
    /// Embedding vector, not serialized
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Create a chunk with a fresh id and no embedding yet
    pub fn new(document_id: Uuid, chunk_index: u32, content: String, metadata: Metadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            chunk_index,
            content,
            metadata,
            embedding: Vec::new(),
        }
    }

    /// Default metadata: `{"source": "uploaded_document"}`
    pub fn default_metadata() -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(
            "source".to_string(),
            serde_json::Value::String(DEFAULT_SOURCE.to_string()),
        );
        metadata
    }

    /// Flatten into the metadata map stored alongside the vector
    pub fn to_vector_metadata(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("chunk_id".to_string(), serde_json::json!(self.id.to_string()));
        map.insert(
            "document_id".to_string(),
            serde_json::json!(self.document_id.to_string()),
        );
        map.insert("chunk_index".to_string(), serde_json::json!(self.chunk_index));
        map.insert("content".to_string(), serde_json::json!(self.content));
        map.insert(
            "metadata".to_string(),
            serde_json::Value::Object(self.metadata.clone().into_iter().collect()),
        );
        map
    }

    /// Rebuild a chunk from stored vector metadata. Returns `None` when the
    /// entry was not written by [`Chunk::to_vector_metadata`].
    pub fn from_vector_metadata(id: &str, map: &HashMap<String, serde_json::Value>) -> Option<Self> {
        let chunk_id = map
            .get("chunk_id")
            .and_then(|v| v.as_str())
            .or(Some(id))
            .and_then(|s| Uuid::parse_str(s).ok())?;

        let document_id = map
            .get("document_id")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())?;

        let content = map.get("content").and_then(|v| v.as_str())?.to_string();

        let chunk_index = map
            .get("chunk_index")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;

        let metadata = match map.get("metadata") {
            Some(serde_json::Value::Object(obj)) => obj.clone().into_iter().collect(),
            _ => Metadata::new(),
        };

        Some(Self {
            id: chunk_id,
            document_id,
            chunk_index,
            content,
            metadata,
            embedding: Vec::new(),
        })
    }
}

/// One uploaded document as it lives in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Document id; every chunk carries it as `document_id`
    pub id: Uuid,
    /// Original filename
    pub filename: String,
    /// File type
    pub file_type: FileType,
    /// Number of chunks stored
    pub total_chunks: u32,
    /// Vector ids of the stored chunks
    pub chunk_ids: Vec<String>,
    /// Ingestion timestamp
    pub ingested_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Create a new, empty document record
    pub fn new(filename: impl Into<String>, file_type: FileType) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            file_type,
            total_chunks: 0,
            chunk_ids: Vec::new(),
            ingested_at: Utc::now(),
        }
    }
}
