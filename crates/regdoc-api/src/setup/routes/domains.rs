//! Domain route groups (documents, chat, regions).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn document_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/documents", API_PREFIX),
            get(handlers::documents::list_documents).post(handlers::documents::upload_document),
        )
        .route(
            &format!("{}/documents/context", API_PREFIX),
            get(handlers::documents::get_document_context),
        )
        .with_state(state)
}

pub fn chat_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/chat", API_PREFIX), post(handlers::chat::ask))
        .route(
            &format!("{}/chat/status", API_PREFIX),
            get(handlers::chat::chat_status),
        )
        .route(
            &format!("{}/chat/welcome", API_PREFIX),
            get(handlers::chat::chat_welcome),
        )
        .with_state(state)
}

pub fn region_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/regions", API_PREFIX),
            get(handlers::regions::list_regions),
        )
        .with_state(state)
}
