//! Chat API integration tests.
//!
//! Run with: `cargo test -p regdoc-api --test chat_test`

mod helpers;

use axum::http::StatusCode;
use helpers::auth::{bearer, regional_admin, super_admin};
use helpers::{api_path, setup_test_app, setup_test_app_with, test_config};
use regdoc_services::test_helpers::MockLanguageModel;
use regdoc_services::QueryError;
use serde_json::{json, Value};

#[tokio::test]
async fn test_ask_returns_model_answer() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path("/chat"))
        .add_header("Authorization", bearer(&regional_admin("REGION-4A")))
        .json(&json!({ "question": "What is the total?", "document_text": "Total: PHP 9M" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["answer"], "Mock answer");
    assert_eq!(body["model"], "mock-model");
    assert_eq!(body["grounded"], true);

    let prompts = app.model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].system.contains("- Region: REGION-4A"));
    assert!(prompts[0].user.starts_with("Document Content: Total: PHP 9M"));
    assert!(prompts[0].user.contains("What is the total?"));
}

#[tokio::test]
async fn test_ask_grounds_on_stored_document() {
    let app = setup_test_app();
    app.storage
        .insert("NCR/1718000000000-summary.txt", b"Revenue: PHP 41M".to_vec());

    let response = app
        .client()
        .post(&api_path("/chat"))
        .add_header("Authorization", bearer(&super_admin()))
        .json(&json!({
            "question": "Summarize",
            "document_key": "NCR/1718000000000-summary.txt",
            "document_text": "ignored"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let prompts = app.model.prompts();
    assert!(prompts[0].user.contains("Revenue: PHP 41M"));
    assert!(!prompts[0].user.contains("ignored"));
}

#[tokio::test]
async fn test_ask_rejects_document_outside_region() {
    let app = setup_test_app();
    app.storage
        .insert("REGION-1/1718000000000-summary.txt", b"secret".to_vec());

    let response = app
        .client()
        .post(&api_path("/chat"))
        .add_header("Authorization", bearer(&regional_admin("NCR")))
        .json(&json!({
            "question": "Summarize",
            "document_key": "REGION-1/1718000000000-summary.txt"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(app.model.call_count(), 0);
}

#[tokio::test]
async fn test_model_failure_is_typed_llm_error() {
    let app = setup_test_app_with(
        test_config(),
        MockLanguageModel::failing(QueryError::Transport("connection reset".to_string())),
    );

    let response = app
        .client()
        .post(&api_path("/chat"))
        .add_header("Authorization", bearer(&regional_admin("NCR")))
        .json(&json!({ "question": "Hello" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["code"], "LLM_ERROR");
    assert_eq!(body["recoverable"], true);
    assert!(body["error"].as_str().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn test_blank_question_is_invalid_input() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path("/chat"))
        .add_header("Authorization", bearer(&regional_admin("NCR")))
        .json(&json!({ "question": "   " }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(app.model.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_body_uses_error_format() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path("/chat"))
        .add_header("Authorization", bearer(&regional_admin("NCR")))
        .json(&json!({ "document_text": "no question" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_status_reports_self_test() {
    let healthy = setup_test_app();
    let body: Value = healthy
        .client()
        .get(&api_path("/chat/status"))
        .add_header("Authorization", bearer(&regional_admin("NCR")))
        .await
        .json();
    assert_eq!(body["connected"], true);
    let prompts = healthy.model.prompts();
    assert!(prompts[0].system.contains("- Region: TEST"));

    let down = setup_test_app_with(test_config(), MockLanguageModel::failing(QueryError::EmptyResponse));
    let body: Value = down
        .client()
        .get(&api_path("/chat/status"))
        .add_header("Authorization", bearer(&regional_admin("NCR")))
        .await
        .json();
    assert_eq!(body["connected"], false);
}

#[tokio::test]
async fn test_welcome_depends_on_role() {
    let app = setup_test_app();

    let regional: Value = app
        .client()
        .get(&api_path("/chat/welcome"))
        .add_header("Authorization", bearer(&regional_admin("REGION-5")))
        .await
        .json();
    assert!(regional["message"]
        .as_str()
        .unwrap()
        .contains("Regional Administrator (REGION-5)"));
    assert_eq!(regional["quick_questions"][3], "What is REGION-5's budget status?");

    let central: Value = app
        .client()
        .get(&api_path("/chat/welcome"))
        .add_header("Authorization", bearer(&super_admin()))
        .await
        .json();
    assert_eq!(central["quick_questions"][3], "Compare allocations across regions");
}
