//! Application state and sub-state extractors.
//!
//! AppState is split into domain sub-states so handlers extract only what
//! they need via Axum's `FromRef`.

use axum::extract::FromRef;
use regdoc_core::{Config, RegionSet};
use regdoc_services::{
    DocumentContextLoader, DocumentLister, DocumentUploader, LanguageModel, QueryResponder,
};
use regdoc_storage::ObjectStorage;
use std::sync::Arc;

/// Lister, uploader and grounding loader over the shared storage handle.
#[derive(Clone)]
pub struct DocumentState {
    pub storage: Arc<dyn ObjectStorage>,
    pub regions: RegionSet,
    pub lister: DocumentLister,
    pub uploader: DocumentUploader,
    pub context_loader: DocumentContextLoader,
}

#[derive(Clone)]
pub struct QueryState {
    pub responder: QueryResponder,
}

pub struct AppState {
    pub config: Config,
    pub documents: DocumentState,
    pub query: QueryState,
}

impl AppState {
    /// Wire every service onto one storage backend and one language model.
    pub fn new(
        config: Config,
        storage: Arc<dyn ObjectStorage>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        let regions = config.regions().clone();
        let context_loader = DocumentContextLoader::new(
            storage.clone(),
            config.grounding_mode(),
            config.grounding_max_chars(),
        );

        let documents = DocumentState {
            storage: storage.clone(),
            regions: regions.clone(),
            lister: DocumentLister::new(storage.clone(), regions.clone()),
            uploader: DocumentUploader::new(
                storage,
                regions,
                config.max_upload_size_bytes(),
            ),
            context_loader,
        };

        let query = QueryState {
            responder: QueryResponder::new(model, config.llm.max_tokens),
        };

        Self {
            config,
            documents,
            query,
        }
    }
}

// ----- FromRef for sub-state extraction -----

impl FromRef<Arc<AppState>> for DocumentState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.documents.clone()
    }
}

impl FromRef<Arc<AppState>> for QueryState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.query.clone()
    }
}
