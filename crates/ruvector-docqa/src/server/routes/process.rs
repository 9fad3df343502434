//! One-shot upload-and-answer endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};

use super::upload::ingest_upload;
use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ProcessResponse, DEFAULT_TOP_K};

/// POST /api/v1/process - Upload a document and answer a question about it
///
/// Multipart fields `file` and `question` are both required.
pub async fn process_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>> {
    let mut upload = None;
    let mut question = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("Failed to read multipart field: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::InvalidRequest(format!("Failed to read file: {}", e)))?;
                upload = Some((filename, data.to_vec()));
            }
            Some("question") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::InvalidRequest(format!("Failed to read question: {}", e)))?;
                question = Some(text);
            }
            _ => {}
        }
    }

    let question = question.filter(|q| !q.trim().is_empty());
    let ((filename, data), question) = match (upload, question) {
        (Some(upload), Some(question)) => (upload, question),
        _ => {
            return Err(Error::InvalidRequest(
                "Both file and question are required".to_string(),
            ))
        }
    };

    ingest_upload(&state, &filename, data).await?;

    let context = state.vector_store().query(&question, DEFAULT_TOP_K).await?;
    let answer = state.generator().generate_answer(&question, &context).await?;

    Ok(Json(ProcessResponse::success(answer, &context)))
}
