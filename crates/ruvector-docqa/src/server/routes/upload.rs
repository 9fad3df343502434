//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::io::Write;

use crate::error::{Error, Result};
use crate::ingestion::DocumentProcessor;
use crate::server::state::AppState;
use crate::types::{DocumentRecord, UploadResponse};

/// POST /api/v1/upload - Upload a document, replacing or extending the store
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| Error::InvalidRequest(format!("Failed to read file: {}", e)))?;
            upload = Some((filename, data.to_vec()));
        }
    }

    let (filename, data) = upload.ok_or_else(|| Error::MissingField("file".to_string()))?;
    let record = ingest_upload(&state, &filename, data).await?;

    Ok(Json(UploadResponse {
        message: format!(
            "Document processed successfully ({} chunk(s) from {})",
            record.total_chunks, record.filename
        ),
    }))
}

/// Write the upload to a temporary file, extract its chunks and store them
///
/// The temporary file is removed when this returns, on success or failure.
pub(crate) async fn ingest_upload(
    state: &AppState,
    filename: &str,
    data: Vec<u8>,
) -> Result<DocumentRecord> {
    DocumentProcessor::supported_type(filename)?;

    tracing::info!("Processing document: {} ({} bytes)", filename, data.len());

    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_lowercase();
    let suffix = format!(".{}", extension);
    let upload_dir = state
        .config()
        .server
        .upload_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let processed = tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&upload_dir)?;
        let mut temp = tempfile::Builder::new()
            .prefix("docqa_upload_")
            .suffix(&suffix)
            .tempfile_in(&upload_dir)?;
        temp.write_all(&data)?;
        temp.flush()?;
        DocumentProcessor::process_document(temp.path())
    })
    .await?
    .map_err(|e| match e {
        Error::FileParse { message, .. } => Error::file_parse(filename, message),
        other => other,
    })?;

    tracing::info!("Processed {} text chunk(s)", processed.chunks.len());

    state
        .vector_store()
        .add_named(filename, processed.file_type, processed.chunks, None)
        .await
}
