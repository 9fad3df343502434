//! API routes for the document QA server

pub mod analyze;
pub mod documents;
pub mod process;
pub mod query;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Uploads - with larger body limit for files
        .route(
            "/upload",
            post(upload::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/process",
            post(process::process_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Questions
        .route("/query", post(query::query_documents))
        .route("/analyze", post(analyze::analyze_question))
        // Document management
        .route("/documents", get(documents::list_documents))
        .route("/documents/:id", delete(documents::delete_document))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "ruvector-docqa",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document question answering over PDF, text and CSV uploads",
        "endpoints": {
            "POST /api/v1/upload": "Upload a document (multipart field 'file')",
            "POST /api/v1/process": "Upload a document and answer a question in one request",
            "POST /api/v1/query?top_k=3": "Answer a question from the stored documents",
            "POST /api/v1/analyze": "Classify a question and extract its entities",
            "GET /api/v1/documents": "List stored documents",
            "DELETE /api/v1/documents/:id": "Delete a document"
        }
    }))
}
