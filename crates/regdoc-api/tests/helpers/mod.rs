//! Test helpers: build AppState and router around in-memory doubles.
//!
//! Run from workspace root: `cargo test -p regdoc-api`.

#![allow(dead_code)]

pub mod auth;

use axum_test::TestServer;
use regdoc_api::constants;
use regdoc_api::setup::routes;
use regdoc_api::state::AppState;
use regdoc_core::Config;
use regdoc_services::test_helpers::{MockLanguageModel, MockStorage};
use std::sync::Arc;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on the doubles behind it.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MockStorage>,
    pub model: Arc<MockLanguageModel>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    Config {
        jwt_secret: Some(auth::TEST_JWT_SECRET.to_string()),
        max_upload_size_bytes: 4096,
        ..Config::default()
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config(), MockLanguageModel::with_reply("Mock answer"))
}

pub fn setup_test_app_with(config: Config, model: MockLanguageModel) -> TestApp {
    let storage = Arc::new(MockStorage::new());
    let model = Arc::new(model);

    let state = Arc::new(AppState::new(config.clone(), storage.clone(), model.clone()));
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        storage,
        model,
    }
}
