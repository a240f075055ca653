//! Document uploader.
//!
//! Writes a file into a region partition under a timestamped key with
//! descriptive metadata. Every failure becomes `UploadOutcome::Failed`.

use chrono::{DateTime, SecondsFormat, Utc};
use regdoc_core::models::{UploadFile, UploadOutcome, UploadReceipt};
use regdoc_core::{format_file_size, RegionSet};
use regdoc_storage::keys::upload_key;
use regdoc_storage::{ObjectMetadata, ObjectStorage};
use std::sync::Arc;

/// How many successive milliseconds are tried before giving up on a key.
const MAX_KEY_ATTEMPTS: i64 = 5;
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub const META_ORIGINAL_NAME: &str = "original-name";
pub const META_UPLOAD_REGION: &str = "upload-region";
pub const META_UPLOAD_DATE: &str = "upload-date";

#[derive(Clone)]
pub struct DocumentUploader {
    storage: Arc<dyn ObjectStorage>,
    regions: RegionSet,
    max_size_bytes: usize,
    clock: fn() -> DateTime<Utc>,
}

impl DocumentUploader {
    pub fn new(storage: Arc<dyn ObjectStorage>, regions: RegionSet, max_size_bytes: usize) -> Self {
        Self {
            storage,
            regions,
            max_size_bytes,
            clock: Utc::now,
        }
    }

    /// Replace the time source used for keys and metadata
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Stores `file` under its trimmed name; the key, the original-name
    /// metadata and the receipt all carry that same name.
    pub async fn upload(&self, mut file: UploadFile, region: &str) -> UploadOutcome {
        file.filename = file.filename.trim().to_string();
        if let Err(error) = self.validate(&file, region) {
            tracing::debug!(
                filename = %file.filename,
                region = %region,
                error = %error,
                "Upload rejected"
            );
            return UploadOutcome::failed(error);
        }

        let now = (self.clock)();
        let key = match self.reserve_key(region, &file.filename, now).await {
            Ok(key) => key,
            Err(error) => {
                tracing::error!(
                    filename = %file.filename,
                    region = %region,
                    error = %error,
                    "Upload key reservation failed"
                );
                return UploadOutcome::failed(error);
            }
        };

        let mut metadata = ObjectMetadata::new();
        metadata.insert(META_ORIGINAL_NAME.to_string(), file.filename.clone());
        metadata.insert(META_UPLOAD_REGION.to_string(), region.to_string());
        metadata.insert(
            META_UPLOAD_DATE.to_string(),
            now.to_rfc3339_opts(SecondsFormat::Millis, true),
        );

        let content_type = if file.content_type.trim().is_empty() {
            DEFAULT_CONTENT_TYPE.to_string()
        } else {
            file.content_type.clone()
        };
        let size_bytes = file.data.len() as u64;

        match self
            .storage
            .put(&key, file.data, &content_type, &metadata)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    key = %key,
                    region = %region,
                    size_bytes,
                    content_type = %content_type,
                    "Document uploaded"
                );
                UploadOutcome::Stored(UploadReceipt {
                    key,
                    name: file.filename,
                    size_bytes,
                    size_label: format_file_size(size_bytes),
                    region: region.to_string(),
                    uploaded_at: now,
                })
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    key = %key,
                    region = %region,
                    "Document upload failed"
                );
                UploadOutcome::failed(e.to_string())
            }
        }
    }

    /// Checks that need no storage access: filename, size and region. The
    /// filename is judged after trimming surrounding whitespace.
    pub fn validate(&self, file: &UploadFile, region: &str) -> Result<(), String> {
        let filename = file.filename.trim();
        if filename.is_empty() {
            return Err("Filename must not be empty".to_string());
        }
        if filename == "." || filename == ".." {
            return Err(format!("Filename '{}' is not a file name", filename));
        }
        if filename.contains('/') || filename.contains('\\') {
            return Err(format!(
                "Filename '{}' must not contain a path separator",
                filename
            ));
        }
        if file.data.is_empty() {
            return Err(format!("File '{}' is empty", filename));
        }
        if file.data.len() > self.max_size_bytes {
            return Err(format!(
                "File '{}' is {} which exceeds the {} upload limit",
                filename,
                format_file_size(file.data.len() as u64),
                format_file_size(self.max_size_bytes as u64)
            ));
        }
        if !self.regions.contains(region) {
            return Err(format!("Unknown region '{}'", region));
        }
        Ok(())
    }

    /// First free key starting at `now`, advancing one millisecond per collision.
    async fn reserve_key(
        &self,
        region: &str,
        filename: &str,
        now: DateTime<Utc>,
    ) -> Result<String, String> {
        let base_millis = now.timestamp_millis();

        for offset in 0..MAX_KEY_ATTEMPTS {
            let key = upload_key(region, base_millis + offset, filename);
            match self.storage.exists(&key).await {
                Ok(false) => return Ok(key),
                Ok(true) => {
                    tracing::debug!(key = %key, "Upload key taken, advancing timestamp");
                }
                Err(e) => return Err(e.to_string()),
            }
        }

        Err(format!(
            "Could not allocate a unique key for '{}' after {} attempts",
            filename, MAX_KEY_ATTEMPTS
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockStorage;
    use chrono::TimeZone;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_718_000_000_123).unwrap()
    }

    fn uploader(storage: &Arc<MockStorage>) -> DocumentUploader {
        DocumentUploader::new(storage.clone(), RegionSet::default(), 1024).with_clock(fixed_clock)
    }

    fn pdf(name: &str, len: usize) -> UploadFile {
        UploadFile::new(name, "application/pdf", vec![7; len])
    }

    fn is_upload_key(key: &str, region: &str, filename: &str) -> bool {
        let Some(rest) = key.strip_prefix(&format!("{}/", region)) else {
            return false;
        };
        let Some((millis, name)) = rest.split_once('-') else {
            return false;
        };
        millis.len() == 13 && millis.bytes().all(|b| b.is_ascii_digit()) && name == filename
    }

    #[tokio::test]
    async fn stores_under_region_with_timestamped_key() {
        let storage = Arc::new(MockStorage::new());
        let outcome = uploader(&storage).upload(pdf("budget.pdf", 10), "REGION-3").await;

        let receipt = match outcome {
            UploadOutcome::Stored(receipt) => receipt,
            other => panic!("expected stored outcome, got {:?}", other),
        };
        assert!(is_upload_key(&receipt.key, "REGION-3", "budget.pdf"));
        assert_eq!(receipt.key, "REGION-3/1718000000123-budget.pdf");
        assert_eq!(receipt.name, "budget.pdf");
        assert_eq!(receipt.region, "REGION-3");
        assert_eq!(receipt.size_label, "10 Bytes");
    }

    #[tokio::test]
    async fn real_clock_produces_thirteen_digit_millis() {
        let storage = Arc::new(MockStorage::new());
        let uploader = DocumentUploader::new(storage.clone(), RegionSet::default(), 1024);
        match uploader.upload(pdf("memo.docx", 3), "NCR").await {
            UploadOutcome::Stored(receipt) => {
                assert!(is_upload_key(&receipt.key, "NCR", "memo.docx"))
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn writes_descriptive_metadata() {
        let storage = Arc::new(MockStorage::new());
        uploader(&storage).upload(pdf("budget.pdf", 10), "NCR").await;

        let object = storage.object("NCR/1718000000123-budget.pdf").unwrap();
        assert_eq!(object.content_type, "application/pdf");
        assert_eq!(
            object.metadata.get(META_ORIGINAL_NAME).map(String::as_str),
            Some("budget.pdf")
        );
        assert_eq!(
            object.metadata.get(META_UPLOAD_REGION).map(String::as_str),
            Some("NCR")
        );
        assert_eq!(
            object.metadata.get(META_UPLOAD_DATE).map(String::as_str),
            Some("2024-06-10T06:13:20.123Z")
        );
    }

    #[tokio::test]
    async fn same_millisecond_collision_advances_timestamp() {
        let storage = Arc::new(MockStorage::new());
        let uploader = uploader(&storage);

        uploader.upload(pdf("budget.pdf", 10), "NCR").await;
        let second = uploader.upload(pdf("budget.pdf", 20), "NCR").await;

        let UploadOutcome::Stored(receipt) = second else {
            panic!("expected stored outcome");
        };
        assert_eq!(receipt.key, "NCR/1718000000124-budget.pdf");
        assert_eq!(storage.object("NCR/1718000000123-budget.pdf").unwrap().data.len(), 10);
        assert_eq!(storage.object("NCR/1718000000124-budget.pdf").unwrap().data.len(), 20);
    }

    #[tokio::test]
    async fn gives_up_after_bounded_attempts() {
        let storage = Arc::new(MockStorage::new());
        for offset in 0..MAX_KEY_ATTEMPTS {
            storage.insert(&format!("NCR/{}-budget.pdf", 1_718_000_000_123 + offset), vec![1]);
        }

        let outcome = uploader(&storage).upload(pdf("budget.pdf", 10), "NCR").await;
        assert!(matches!(outcome, UploadOutcome::Failed { .. }));
        assert!(storage.put_calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_files_fail_before_storage() {
        let storage = Arc::new(MockStorage::new());
        let uploader = uploader(&storage);

        for (file, region) in [
            (pdf("", 10), "NCR"),
            (pdf("   ", 10), "NCR"),
            (pdf(".", 10), "NCR"),
            (pdf("..", 10), "NCR"),
            (pdf("../escape.pdf", 10), "NCR"),
            (pdf("nested/name.pdf", 10), "NCR"),
            (pdf("nested\\name.pdf", 10), "NCR"),
            (pdf("empty.pdf", 0), "NCR"),
            (pdf("huge.pdf", 2048), "NCR"),
            (pdf("budget.pdf", 10), "REGION-99"),
            (pdf("budget.pdf", 10), "ALL"),
        ] {
            let outcome = uploader.upload(file, region).await;
            assert!(matches!(outcome, UploadOutcome::Failed { .. }), "{:?}", outcome);
        }
        assert!(storage.put_calls().is_empty());
    }

    #[tokio::test]
    async fn dots_inside_a_filename_are_accepted() {
        let storage = Arc::new(MockStorage::new());
        let uploader = uploader(&storage);

        for name in ["v1..2.pdf", "..budget.pdf", ".hidden"] {
            let outcome = uploader.upload(pdf(name, 10), "NCR").await;
            let UploadOutcome::Stored(receipt) = outcome else {
                panic!("expected {} to be stored, got {:?}", name, outcome);
            };
            assert_eq!(receipt.name, name);
        }
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_trimmed_everywhere() {
        let storage = Arc::new(MockStorage::new());
        let outcome = uploader(&storage).upload(pdf("  budget.pdf ", 10), "NCR").await;

        let UploadOutcome::Stored(receipt) = outcome else {
            panic!("expected stored outcome, got {:?}", outcome);
        };
        assert_eq!(receipt.key, "NCR/1718000000123-budget.pdf");
        assert_eq!(receipt.name, "budget.pdf");
        let object = storage.object("NCR/1718000000123-budget.pdf").unwrap();
        assert_eq!(
            object.metadata.get(META_ORIGINAL_NAME).map(String::as_str),
            Some("budget.pdf")
        );
    }

    #[tokio::test]
    async fn storage_error_becomes_failed_outcome() {
        let storage = Arc::new(MockStorage::new());
        storage.fail_puts("access denied");

        let outcome = uploader(&storage).upload(pdf("budget.pdf", 10), "NCR").await;
        match outcome {
            UploadOutcome::Failed { error } => assert!(error.contains("access denied")),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_content_type_defaults_to_octet_stream() {
        let storage = Arc::new(MockStorage::new());
        let file = UploadFile::new("notes.bin", "", vec![1, 2]);
        uploader(&storage).upload(file, "NCR").await;

        let object = storage.object("NCR/1718000000123-notes.bin").unwrap();
        assert_eq!(object.content_type, "application/octet-stream");
    }
}
