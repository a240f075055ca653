//! Health check handlers and response types.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Key probed to prove the storage backend answers; it need not exist.
const HEALTH_PROBE_KEY: &str = ".regdoc-health";

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(serde::Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub storage: String,
    pub storage_backend: String,
    pub language_model: String,
    pub regions: usize,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Storage reachability plus language model configuration. The model is not
/// called here; `/api/v0/chat/status` runs the self-test.
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let storage = state.documents.storage.clone();
    let storage_backend = storage.backend_type().to_string();
    let storage_status = run_check(
        TIMEOUT,
        async move { storage.exists(HEALTH_PROBE_KEY).await.map(drop) },
        "unhealthy",
    )
    .await;

    let overall_healthy = storage_status == "healthy";
    let language_model = if state.query.responder.is_configured() {
        "configured"
    } else {
        "not_configured"
    };

    let response = HealthCheckResponse {
        status: if overall_healthy { "healthy" } else { "degraded" }.to_string(),
        storage: storage_status,
        storage_backend,
        language_model: language_model.to_string(),
        regions: state.config.regions().len(),
    };

    let status_code = if overall_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
