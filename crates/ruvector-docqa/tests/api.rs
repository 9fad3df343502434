//! HTTP API tests driving the router in-process

mod common;

use axum::http::StatusCode;
use ruvector_docqa::{
    config::StoreScope,
    nlu::PatternEntityRecognizer,
    server::{build_router, state::AppState},
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn root_and_health() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let response = app.clone().oneshot(empty_request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["health_check"], "/health");
    assert!(body["message"].is_string());

    let response = app.clone().oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "healthy" }));

    let response = app.oneshot(empty_request("GET", "/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn process_answers_from_uploaded_text() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let request = multipart_request(
        "/api/v1/process",
        &[
            file_part("paris.txt", b"Paris is the capital of France."),
            text_part("question", "What is the capital of France?"),
        ],
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["document_processed"], true);
    assert_eq!(body["context"], "Paris is the capital of France.");
    let answer = body["answer"].as_str().unwrap();
    assert!(!answer.is_empty());
    assert!(answer.contains("Paris"));
}

#[tokio::test]
async fn process_requires_question() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let request = multipart_request(
        "/api/v1/process",
        &[file_part("paris.txt", b"Paris is the capital of France.")],
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["type"], "invalid_request");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Both file and question are required"));
}

#[tokio::test]
async fn process_requires_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let request = multipart_request(
        "/api/v1/process",
        &[text_part("question", "What is the capital of France?")],
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_rejects_unsupported_format() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let request = multipart_request("/api/v1/upload", &[file_part("slides.pptx", b"PK\x03\x04")]);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["type"], "unsupported_type");
    assert_eq!(body["detail"], "Unsupported file format: pptx");
}

#[tokio::test]
async fn process_reports_unsupported_format_like_upload() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let request = multipart_request(
        "/api/v1/process",
        &[
            file_part("Slides.PPTX", b"PK\x03\x04"),
            text_part("question", "What is on the slides?"),
        ],
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["detail"],
        "Unsupported file format: pptx"
    );
}

#[tokio::test]
async fn failed_uploads_keep_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/api/v1/upload",
            &[file_part("apples.txt", b"apples are red")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(staged_files(dir.path()), 0);

    let rejected: [(&str, &[u8], &str); 3] = [
        ("notes.txt", b"\xff\xfe\xfd", "parse_error"),
        ("empty.csv", b"", "empty_document"),
        ("slides.pptx", b"PK\x03\x04", "unsupported_type"),
    ];
    for (name, content, error_type) in rejected {
        let response = app
            .clone()
            .oneshot(multipart_request("/api/v1/upload", &[file_part(name, content)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", name);
        assert_eq!(json_body(response).await["error"]["type"], error_type);
        assert_eq!(staged_files(dir.path()), 0, "{} left a temporary file", name);
    }

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/query",
            json!({ "question": "what colour are apples?" }),
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["context"], json!(["apples are red"]));

    let response = app
        .oneshot(empty_request("GET", "/api/v1/documents"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["documents"][0]["filename"], "apples.txt");
}

#[tokio::test]
async fn upload_rejects_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let request = multipart_request("/api/v1/upload", &[file_part("notes.txt", b"\xff\xfe\xfd")]);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["type"], "parse_error");
    assert!(body["detail"].as_str().unwrap().contains("notes.txt"));
}

#[tokio::test]
async fn upload_then_query_csv_rows() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let csv = b"name,city\nalice,paris\nbob,berlin\n";
    let response = app
        .clone()
        .oneshot(multipart_request("/api/v1/upload", &[file_part("people.csv", csv)]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("3 chunk(s)"));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/query?top_k=10",
            json!({ "question": "Where does alice live?" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["top_k"], 10);
    let mut context: Vec<String> = body["context"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(context.len(), 3);
    assert_eq!(context[0], "alice paris");
    context.sort();
    assert_eq!(context, vec!["alice paris", "bob berlin", "name city"]);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/query?top_k=1",
            json!({ "question": "Where does alice live?" }),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["context"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn query_with_huge_top_k_returns_every_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let csv = b"one fish\ntwo fish\nred fish\n";
    app.clone()
        .oneshot(multipart_request("/api/v1/upload", &[file_part("fish.csv", csv)]))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/query?top_k=18446744073709551615",
            json!({ "question": "Which fish?" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["top_k"], json!(u64::MAX));
    assert_eq!(body["context"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn ready_reflects_embedder_health() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), StoreScope::Session);
    let state = AppState::from_parts(
        config,
        Arc::new(UnavailableEmbedder::new(128)),
        Arc::new(StubLlm),
        Arc::new(PatternEntityRecognizer::new()),
    )
    .unwrap();
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/ready"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Liveness does not depend on the backends
    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn query_defaults_to_three_chunks_and_reports_nlu() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let csv = b"one fish\ntwo fish\nred fish\nblue fish\n";
    app.clone()
        .oneshot(multipart_request("/api/v1/upload", &[file_part("fish.csv", csv)]))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/query",
            json!({ "question": "Which fish is red?" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["top_k"], 3);
    assert_eq!(body["context"].as_array().unwrap().len(), 3);
    assert_eq!(body["nlu"]["question"], "Which fish is red?");
    assert_eq!(body["nlu"]["labels"].as_array().unwrap().len(), 6);
    assert_eq!(body["nlu"]["top_label"], body["nlu"]["labels"][0]);
}

#[tokio::test]
async fn query_without_documents_still_answers() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/query",
            json!({ "question": "Anything there?" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["context"].as_array().unwrap().is_empty());
    assert_eq!(body["answer"], "I don't know.");
}

#[tokio::test]
async fn query_rejects_blank_question() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let response = app
        .oneshot(json_request("POST", "/api/v1/query", json!({ "question": "   " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn nlu_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), StoreScope::Session);
    config.nlu.enabled = false;
    let app = build_router(test_state(config));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/query",
            json!({ "question": "What is it?" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await["nlu"].is_null());
}

#[tokio::test]
async fn analyze_filters_entities() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/analyze",
            json!({
                "question": "Did Dr. Jane Smith work for Acme Corp in New York?",
                "entity_types": ["ORG", "LOC"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["scores"].as_array().unwrap().len(), 6);
    assert_eq!(body["entities"].as_array().unwrap().len(), 3);
    assert_eq!(body["filtered_entities"], json!(["Acme Corp", "New York"]));
}

#[tokio::test]
async fn documents_list_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(test_state(test_config(dir.path(), StoreScope::Corpus)));

    for (name, text) in [("a.txt", "first file"), ("b.txt", "second file")] {
        let response = app
            .clone()
            .oneshot(multipart_request(
                "/api/v1/upload",
                &[file_part(name, text.as_bytes())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/documents"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["scope"], "corpus");
    assert_eq!(body["documents"][0]["filename"], "a.txt");
    let id = body["documents"][0]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/documents/{}", id);
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted_chunks"], 1);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("GET", "/api/v1/documents"))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["total_count"], 1);
}

#[tokio::test]
async fn session_upload_replaces_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    for (name, text) in [("a.txt", "apples are red"), ("b.txt", "the sky is blue")] {
        app.clone()
            .oneshot(multipart_request(
                "/api/v1/upload",
                &[file_part(name, text.as_bytes())],
            ))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/query",
            json!({ "question": "what colour are apples?" }),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["context"], json!(["the sky is blue"]));
}
