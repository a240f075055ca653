//! Service initialization and application state setup

use crate::state::AppState;
use anyhow::Result;
use regdoc_core::Config;
use regdoc_services::create_language_model;
use regdoc_storage::ObjectStorage;
use std::sync::Arc;

pub fn initialize_services(
    config: Config,
    storage: Arc<dyn ObjectStorage>,
) -> Result<Arc<AppState>> {
    let model = create_language_model(&config.llm)?;
    tracing::info!(
        model = %model.model_id(),
        configured = model.is_configured(),
        "Language model client initialized"
    );

    Ok(Arc::new(AppState::new(config, storage, model)))
}
