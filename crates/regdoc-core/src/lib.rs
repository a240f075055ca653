//! Regdoc Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! region enumeration shared across all regdoc components.

pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod region;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, GroundingMode, LlmConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use format::format_file_size;
pub use region::{RegionSet, ALL_REGIONS};
pub use storage_types::StorageBackend;
