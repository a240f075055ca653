//! Regdoc Storage Library
//!
//! Object storage abstraction for regional documents, with implementations for
//! S3 (and S3-compatible endpoints) and the local filesystem.
//!
//! # Storage key format
//!
//! Every document lives under its region's partition:
//!
//! - **Partition prefix**: `{region}/`
//! - **Uploaded document**: `{region}/{epoch_millis}-{original_filename}`
//!
//! Keys must not have `.` or `..` segments or a leading `/`. Key generation is centralized in
//! the `keys` module so all backends and the services stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use regdoc_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectMetadata, ObjectStorage, StorageError, StorageResult, StoredObject};
