//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regdoc_core::AppError;
use std::collections::BTreeMap;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::ListFailed(msg)
            | StorageError::UploadFailed(msg)
            | StorageError::DownloadFailed(msg)
            | StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// User metadata stored alongside an object (`x-amz-meta-*` on S3).
pub type ObjectMetadata = BTreeMap<String, String>;

/// One entry of a storage listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// lister and uploader never couple to a specific provider.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// List objects directly under `prefix` (one level, `/` delimiter).
    ///
    /// Entries in nested "folders" are not returned. A directory marker object
    /// whose key equals the prefix may be returned; callers filter it.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredObject>>;

    /// Write `data` at `key` with the given content type and user metadata.
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> StorageResult<()>;

    /// Read the full object at `key`
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Describe the object at `key`; `StorageError::NotFound` when absent.
    async fn head(&self, key: &str) -> StorageResult<StoredObject>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        match self.head(key).await {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(StorageError::NotFound("NCR/x.pdf".to_string())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(StorageError::InvalidKey("../x".to_string())),
            AppError::InvalidInput(_)
        ));
        assert!(matches!(
            AppError::from(StorageError::ListFailed("denied".to_string())),
            AppError::Storage(_)
        ));
        assert!(matches!(
            AppError::from(StorageError::ConfigError("no bucket".to_string())),
            AppError::Internal(_)
        ));
    }
}
