//! Storage setup and initialization

use anyhow::Result;
use regdoc_core::Config;
use regdoc_storage::{create_storage, ObjectStorage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    tracing::info!("Initializing document storage...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Document storage initialized successfully"
    );
    Ok(storage)
}
