//! Question answering over the stored documents

use axum::{
    extract::{Query, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{QueryParams, QueryRequest, QueryResponse};

/// POST /api/v1/query?top_k=3 - Answer a question from the top-k chunks
pub async fn query_documents(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();
    let question = request.question.trim();
    if question.is_empty() {
        return Err(Error::InvalidRequest("Question must not be empty".to_string()));
    }

    tracing::info!("Query: '{}' (top_k {})", question, params.top_k);

    let analysis = async {
        if state.nlu_enabled() {
            state.analyzer().analyze(question).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let retrieval = state.vector_store().query(question, params.top_k);
    let (nlu, context) = futures::try_join!(analysis, retrieval)?;

    let answer = state.generator().generate_answer(question, &context).await?;

    tracing::info!(
        "Answered with {} context chunk(s) in {:.1}s",
        context.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(Json(QueryResponse {
        nlu,
        answer,
        context,
        top_k: params.top_k,
    }))
}
