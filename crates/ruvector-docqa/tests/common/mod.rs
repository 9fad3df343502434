//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ruvector_docqa::{
    config::{EmbeddingBackend, GenerationConfig, RagConfig, StoreScope, VectorDbConfig},
    embeddings::{EmbeddingProvider, HashingEmbedder},
    generation::LlmProvider,
    nlu::PatternEntityRecognizer,
    server::{build_router, state::AppState},
    Result,
};

pub const BOUNDARY: &str = "docqa-test-boundary";

/// Answers with the first context line of the prompt
pub struct StubLlm;

#[async_trait]
impl LlmProvider for StubLlm {
    async fn generate(&self, prompt: &str, _options: &GenerationConfig) -> Result<String> {
        let context = prompt.split(" context: ").nth(1).unwrap_or("");
        let first = context.lines().next().unwrap_or("").trim();
        if first.is_empty() {
            Ok("I don't know.".to_string())
        } else {
            Ok(format!("Based on the document: {}", first))
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

/// Hashing embedder whose health check reports the backend as down
pub struct UnavailableEmbedder(HashingEmbedder);

impl UnavailableEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self(HashingEmbedder::new(dimensions))
    }
}

#[async_trait]
impl EmbeddingProvider for UnavailableEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.0.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.0.dimensions()
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// Offline configuration rooted in `dir`
pub fn test_config(dir: &Path, scope: StoreScope) -> RagConfig {
    let mut config = RagConfig::default();
    config.embeddings.backend = EmbeddingBackend::Hashing;
    config.embeddings.dimensions = 128;
    config.vector_db = VectorDbConfig::in_dir(dir);
    config.vector_db.scope = scope;
    config.server.upload_dir = Some(upload_dir(dir));
    config
}

/// Where uploads are staged for the store rooted in `dir`
pub fn upload_dir(dir: &Path) -> PathBuf {
    dir.join("uploads")
}

/// Files currently staged under `dir`
pub fn staged_files(dir: &Path) -> usize {
    std::fs::read_dir(upload_dir(dir))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

pub fn test_state(config: RagConfig) -> AppState {
    let dimensions = config.embeddings.dimensions;
    AppState::from_parts(
        config,
        Arc::new(HashingEmbedder::new(dimensions)),
        Arc::new(StubLlm),
        Arc::new(PatternEntityRecognizer::new()),
    )
    .expect("state builds")
}

pub fn test_router(dir: &Path) -> Router {
    build_router(test_state(test_config(dir, StoreScope::Session)))
}

/// One multipart part: (field name, optional filename, content)
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content: &'a [u8],
}

pub fn file_part<'a>(filename: &'a str, content: &'a [u8]) -> Part<'a> {
    Part {
        name: "file",
        filename: Some(filename),
        content,
    }
}

pub fn text_part<'a>(name: &'a str, content: &'a str) -> Part<'a> {
    Part {
        name,
        filename: None,
        content: content.as_bytes(),
    }
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    part.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name).as_bytes(),
            ),
        }
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("request builds")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is JSON")
}
