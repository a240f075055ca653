use crate::keys::validate_key;
use crate::traits::{ObjectMetadata, ObjectStorage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Directory under the base path that holds per-object metadata sidecars.
const METADATA_DIR: &str = ".meta";

/// Local filesystem storage implementation
///
/// Objects are plain files under `base_path`; content type and user metadata are
/// kept as JSON sidecars at `.meta/{key}.json`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path`
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        if key.split('/').next() == Some(METADATA_DIR) {
            return Err(StorageError::InvalidKey(format!(
                "Storage key '{}' is reserved",
                key
            )));
        }
        Ok(self.base_path.join(key))
    }

    fn metadata_path(&self, key: &str) -> PathBuf {
        self.base_path.join(METADATA_DIR).join(format!("{}.json", key))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn describe(key: String, path: &Path) -> StorageResult<StoredObject> {
        let meta = fs::metadata(path).await?;
        let last_modified: DateTime<Utc> = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        Ok(StoredObject {
            key,
            size: meta.len(),
            last_modified,
        })
    }

    /// Read back the sidecar written by `put`.
    pub async fn read_metadata(&self, key: &str) -> StorageResult<ObjectMetadata> {
        validate_key(key)?;
        let raw = fs::read(self.metadata_path(key)).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                StorageError::IoError(e)
            }
        })?;
        serde_json::from_slice(&raw).map_err(|e| StorageError::BackendError(e.to_string()))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        let dir_key = prefix.trim_end_matches('/');
        let dir = if dir_key.is_empty() {
            self.base_path.clone()
        } else {
            self.key_to_path(dir_key)?
        };

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %dir.display(),
                    "Local storage listing failed"
                );
                return Err(StorageError::ListFailed(e.to_string()));
            }
        };

        let mut objects = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?
        {
            let file_type = entry.file_type().await?;
            if !file_type.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let key = if dir_key.is_empty() {
                name
            } else {
                format!("{}/{}", dir_key, name)
            };
            objects.push(Self::describe(key, &entry.path()).await?);
        }

        // read_dir order is platform dependent
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let mut sidecar = metadata.clone();
        sidecar.insert("content-type".to_string(), content_type.to_string());
        let sidecar_path = self.metadata_path(key);
        self.ensure_parent_dir(&sidecar_path).await?;
        let encoded = serde_json::to_vec_pretty(&sidecar)
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        fs::write(&sidecar_path, encoded).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write metadata {}: {}",
                sidecar_path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage download successful"
        );

        Ok(data)
    }

    async fn head(&self, key: &str) -> StorageResult<StoredObject> {
        let path = self.key_to_path(key)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Self::describe(key.to_string(), &path).await,
            Ok(_) => Err(StorageError::NotFound(key.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
