//! Question answering over the caller's documents.

use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::{AppState, QueryState};
use axum::{extract::State, Json};
use regdoc_core::AppError;
use regdoc_services::{quick_questions, welcome_message};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub question: String,
    /// Ground the answer on a stored document the caller may read
    #[serde(default)]
    pub document_key: Option<String>,
    /// Ground the answer on caller-supplied text; ignored when `document_key` is set
    #[serde(default)]
    pub document_text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub answer: String,
    pub model: String,
    pub grounded: bool,
}

#[utoipa::path(
    post,
    path = "/api/v0/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Model answer", body = ChatResponse),
        (status = 400, description = "Empty question or malformed key", body = ErrorResponse),
        (status = 403, description = "Document is outside the caller's regions", body = ErrorResponse),
        (status = 502, description = "Language model failure (LLM_ERROR)", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>, HttpAppError> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(HttpAppError(AppError::InvalidInput(
            "Question must not be empty".to_string(),
        )));
    }

    let document_key = request.document_key.filter(|key| !key.trim().is_empty());
    let document_text = match document_key {
        Some(key) => {
            let docs = &state.documents;
            let document = docs.lister.find_document(&user, &key).await?;
            docs.context_loader.load(&document).await
        }
        None => request.document_text.unwrap_or_default(),
    };

    let responder = &state.query.responder;
    let answer = responder
        .ask(question, &document_text, &user.region, user.role)
        .await?;

    Ok(Json(ChatResponse {
        answer,
        model: responder.model_id().to_string(),
        grounded: !document_text.is_empty(),
    }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatStatusResponse {
    pub connected: bool,
    pub configured: bool,
    pub model: String,
}

#[utoipa::path(
    get,
    path = "/api/v0/chat/status",
    tag = "chat",
    responses(
        (status = 200, description = "Result of the model self-test", body = ChatStatusResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn chat_status(
    State(query): State<QueryState>,
    _user: CurrentUser,
) -> Json<ChatStatusResponse> {
    let responder = &query.responder;
    Json(ChatStatusResponse {
        connected: responder.test_connection().await,
        configured: responder.is_configured(),
        model: responder.model_id().to_string(),
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
    pub quick_questions: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/v0/chat/welcome",
    tag = "chat",
    responses(
        (status = 200, description = "Greeting and suggested questions for the caller", body = WelcomeResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn chat_welcome(CurrentUser(user): CurrentUser) -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: welcome_message(&user),
        quick_questions: quick_questions(&user).to_vec(),
    })
}
