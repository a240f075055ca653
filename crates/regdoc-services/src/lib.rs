//! Regdoc Services Layer
//!
//! This crate is the business service layer: the access-scoped document
//! lister, the uploader, the context-aware query responder and the chat
//! session built on it. Presentation crates (HTTP API, CLI) stay thin and call
//! into these services.

pub mod chat;
pub mod grounding;
pub mod lister;
pub mod llm;
pub mod prompt;
pub mod responder;
pub mod uploader;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use chat::{quick_questions, welcome_message, ChatSession};
pub use grounding::DocumentContextLoader;
pub use lister::{document_stats, filter_documents, DocumentLister, DocumentListing, RegionListing};
pub use llm::{create_language_model, AnthropicClient, LanguageModel, QueryError};
pub use responder::QueryResponder;
pub use uploader::DocumentUploader;
