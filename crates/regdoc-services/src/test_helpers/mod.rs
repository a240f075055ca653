//! Test doubles for the storage and language model seams.
//!
//! Enabled for this crate's own tests and, through the `test-helpers` feature,
//! for the API and CLI test suites.

pub mod mock_llm;
pub mod mock_storage;

pub use mock_llm::{CapturedPrompt, MockLanguageModel};
pub use mock_storage::{MockObject, MockStorage};
