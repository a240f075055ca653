use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::format::format_file_size;

/// Length of the epoch-milliseconds prefix the uploader puts on every key.
pub const TIMESTAMP_PREFIX_DIGITS: usize = 13;

/// A stored document as presented to users. Projection of an object-store
/// listing entry; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Document {
    /// Storage key, always `"{region}/..."`
    pub key: String,
    /// Display filename
    pub name: String,
    pub size_bytes: u64,
    pub size_label: String,
    pub last_modified: DateTime<Utc>,
    pub region: String,
}

impl Document {
    pub fn from_listing(
        region: &str,
        key: String,
        size_bytes: u64,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            name: display_name_from_key(&key),
            size_label: format_file_size(size_bytes),
            key,
            size_bytes,
            last_modified,
            region: region.to_string(),
        }
    }
}

/// Final path segment of `key`, minus the `<13-digit-millis>-` upload prefix
/// when present.
pub fn display_name_from_key(key: &str) -> String {
    let segment = key.rsplit('/').next().unwrap_or(key);
    match segment.split_once('-') {
        Some((millis, rest))
            if millis.len() == TIMESTAMP_PREFIX_DIGITS
                && millis.bytes().all(|b| b.is_ascii_digit())
                && !rest.is_empty() =>
        {
            rest.to_string()
        }
        _ => segment.to_string(),
    }
}

/// A file handed to the uploader.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadReceipt {
    pub key: String,
    /// Original filename as supplied by the caller
    pub name: String,
    pub size_bytes: u64,
    pub size_label: String,
    pub region: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Result of an upload. Failures carry the message instead of propagating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Stored(UploadReceipt),
    Failed { error: String },
}

impl UploadOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        UploadOutcome::Failed {
            error: error.into(),
        }
    }
}

/// Summary figures shown above a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DocumentStats {
    pub total: usize,
    /// Number of distinct regions among the documents
    pub regions: usize,
    pub total_size_bytes: u64,
    pub total_size_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_region_and_timestamp_prefix() {
        assert_eq!(
            display_name_from_key("REGION-3/1718000000000-budget.pdf"),
            "budget.pdf"
        );
    }

    #[test]
    fn keeps_hyphens_inside_the_filename() {
        assert_eq!(
            display_name_from_key("NCR/1718000000000-q1-2024-report.xlsx"),
            "q1-2024-report.xlsx"
        );
    }

    #[test]
    fn keys_without_timestamp_keep_their_segment() {
        assert_eq!(display_name_from_key("NCR/annual-report.pdf"), "annual-report.pdf");
        assert_eq!(display_name_from_key("NCR/12345-short.pdf"), "12345-short.pdf");
        assert_eq!(display_name_from_key("loose.txt"), "loose.txt");
    }

    #[test]
    fn from_listing_formats_size() {
        let doc = Document::from_listing(
            "REGION-1",
            "REGION-1/1718000000000-memo.docx".to_string(),
            1536,
            Utc::now(),
        );
        assert_eq!(doc.name, "memo.docx");
        assert_eq!(doc.size_label, "1.5 KB");
        assert_eq!(doc.region, "REGION-1");
        assert!(doc.key.starts_with("REGION-1/"));
    }
}
