//! Mock storage implementation for testing

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use regdoc_storage::{
    ObjectMetadata, ObjectStorage, StorageBackend, StorageError, StorageResult, StoredObject,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct MockObject {
    pub data: Vec<u8>,
    pub content_type: String,
    pub metadata: ObjectMetadata,
    pub last_modified: DateTime<Utc>,
}

/// Mock storage that keeps objects in memory, records listing calls and can be
/// scripted to fail per prefix.
pub struct MockStorage {
    objects: Mutex<BTreeMap<String, MockObject>>,
    failing_prefixes: Mutex<HashSet<String>>,
    put_failure: Mutex<Option<String>>,
    get_failure: Mutex<Option<String>>,
    list_calls: Mutex<Vec<String>>,
    put_calls: Mutex<Vec<String>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            failing_prefixes: Mutex::new(HashSet::new()),
            put_failure: Mutex::new(None),
            get_failure: Mutex::new(None),
            list_calls: Mutex::new(Vec::new()),
            put_calls: Mutex::new(Vec::new()),
        }
    }

    /// Insert an object with a fixed modification time
    pub fn insert(&self, key: &str, data: Vec<u8>) {
        let last_modified = Utc
            .timestamp_millis_opt(1_718_000_000_000)
            .single()
            .unwrap_or_else(Utc::now);
        self.objects.lock().unwrap().insert(
            key.to_string(),
            MockObject {
                data,
                content_type: "application/octet-stream".to_string(),
                metadata: ObjectMetadata::new(),
                last_modified,
            },
        );
    }

    /// Make every `list` call for `prefix` fail
    pub fn fail_list(&self, prefix: &str) {
        self.failing_prefixes
            .lock()
            .unwrap()
            .insert(prefix.to_string());
    }

    /// Make every `put` call fail with `message`
    pub fn fail_puts(&self, message: &str) {
        *self.put_failure.lock().unwrap() = Some(message.to_string());
    }

    /// Make every `get` call fail with `message`
    pub fn fail_gets(&self, message: &str) {
        *self.get_failure.lock().unwrap() = Some(message.to_string());
    }

    /// Prefixes passed to `list`, in call order
    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    /// Keys passed to `put`, in call order
    pub fn put_calls(&self) -> Vec<String> {
        self.put_calls.lock().unwrap().clone()
    }

    pub fn object(&self, key: &str) -> Option<MockObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        self.list_calls.lock().unwrap().push(prefix.to_string());

        if self.failing_prefixes.lock().unwrap().contains(prefix) {
            return Err(StorageError::ListFailed(format!(
                "simulated listing failure for {}",
                prefix
            )));
        }

        let objects = self.objects.lock().unwrap();
        Ok(objects
            .iter()
            .filter(|(key, _)| {
                key.strip_prefix(prefix)
                    .map(|rest| !rest.contains('/'))
                    .unwrap_or(false)
            })
            .map(|(key, object)| StoredObject {
                key: key.clone(),
                size: object.data.len() as u64,
                last_modified: object.last_modified,
            })
            .collect())
    }

    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> StorageResult<()> {
        self.put_calls.lock().unwrap().push(key.to_string());

        if let Some(message) = self.put_failure.lock().unwrap().clone() {
            return Err(StorageError::UploadFailed(message));
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            MockObject {
                data,
                content_type: content_type.to_string(),
                metadata: metadata.clone(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        if let Some(message) = self.get_failure.lock().unwrap().clone() {
            return Err(StorageError::DownloadFailed(message));
        }

        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn head(&self, key: &str) -> StorageResult<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|object| StoredObject {
                key: key.to_string(),
                size: object.data.len() as u64,
                last_modified: object.last_modified,
            })
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
