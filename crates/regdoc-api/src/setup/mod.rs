//! Application setup and initialization
//!
//! Everything `main` needs to go from a `Config` to a served router, split so
//! tests can build the router around their own services.

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use regdoc_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    let log_format = config.log_format().parse()?;
    regdoc_infra::init_telemetry(log_format, None)?;

    tracing::info!(
        environment = %config.environment,
        regions = config.regions().len(),
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;
    let state = services::initialize_services(config.clone(), storage)?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
