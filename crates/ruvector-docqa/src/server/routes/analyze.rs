//! Intent analysis endpoint

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::nlu::filter_entities;
use crate::server::state::AppState;
use crate::types::{AnalyzeRequest, AnalyzeResponse};

/// POST /api/v1/analyze - Classify a question and list its entities
pub async fn analyze_question(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>> {
    if request.question.trim().is_empty() {
        return Err(Error::InvalidRequest("Question must not be empty".to_string()));
    }

    let analysis = state.analyzer().analyze(&request.question).await?;
    let filtered_entities = request
        .entity_types
        .as_deref()
        .map(|types| filter_entities(&analysis.entities, types));

    Ok(Json(AnalyzeResponse {
        analysis,
        filtered_entities,
    }))
}
