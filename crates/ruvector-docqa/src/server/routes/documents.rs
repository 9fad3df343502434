//! Document management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{DeleteResponse, DocumentListResponse, DocumentSummary};

/// GET /api/v1/documents - List the documents currently in the store
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentListResponse>> {
    let documents: Vec<DocumentSummary> = state
        .vector_store()
        .list_documents()
        .await
        .iter()
        .map(DocumentSummary::from)
        .collect();

    let total_count = documents.len();

    Ok(Json(DocumentListResponse {
        documents,
        total_count,
        scope: state.vector_store().scope(),
    }))
}

/// DELETE /api/v1/documents/:id - Delete a document and its chunks
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    let deleted_chunks = state.vector_store().delete_document(&id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        document_id: id,
        deleted_chunks,
    }))
}
