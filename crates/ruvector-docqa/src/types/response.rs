//! Response types for the HTTP API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{DocumentRecord, FileType};
use crate::config::StoreScope;
use crate::nlu::IntentAnalysis;

/// Response of `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Response of `POST /process`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// Always "success"; failures are reported as HTTP errors
    pub status: String,
    /// Generated answer
    pub answer: String,
    /// The single best-ranked context chunk, or "" if none
    pub context: String,
    /// Whether the uploaded document was indexed
    pub document_processed: bool,
}

impl ProcessResponse {
    /// Successful response from an answer and its ranked context
    pub fn success(answer: String, context: &[String]) -> Self {
        Self {
            status: "success".to_string(),
            answer,
            context: context.first().cloned().unwrap_or_default(),
            document_processed: true,
        }
    }
}

/// Response of `POST /query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Intent analysis of the question, `null` when disabled
    pub nlu: Option<IntentAnalysis>,
    /// Generated answer
    pub answer: String,
    /// Retrieved chunks, best match first
    pub context: Vec<String>,
    /// Requested number of chunks
    pub top_k: usize,
}

/// Response of `POST /analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Full analysis
    #[serde(flatten)]
    pub analysis: IntentAnalysis,
    /// Entity words surviving the `entity_types` filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered_entities: Option<Vec<String>>,
}

/// Summary of a stored document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document ID
    pub id: Uuid,
    /// Filename
    pub filename: String,
    /// File type
    pub file_type: FileType,
    /// Number of chunks created
    pub total_chunks: u32,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl From<&DocumentRecord> for DocumentSummary {
    fn from(doc: &DocumentRecord) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            file_type: doc.file_type,
            total_chunks: doc.total_chunks,
            ingested_at: doc.ingested_at,
        }
    }
}

/// Response for listing documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    /// List of documents
    pub documents: Vec<DocumentSummary>,
    /// Total count
    pub total_count: usize,
    /// Store scope the server runs with
    pub scope: StoreScope,
}

/// Response for deleting a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Whether the document was removed
    pub success: bool,
    /// Removed document
    pub document_id: Uuid,
    /// Number of vectors deleted
    pub deleted_chunks: usize,
}
