//! Shared key generation for storage backends.
//!
//! Key format: `{region}/{epoch_millis}-{filename}`, listed through the
//! `{region}/` partition prefix.

use crate::traits::{StorageError, StorageResult};

/// Listing prefix of a region partition.
pub fn region_prefix(region: &str) -> String {
    format!("{}/", region.trim_end_matches('/'))
}

/// Key of an uploaded document. `millis` is rendered without padding, which is
/// 13 digits for any timestamp between 2001 and 2286.
pub fn upload_key(region: &str, millis: i64, filename: &str) -> String {
    format!("{}{}-{}", region_prefix(region), millis, filename)
}

/// True for the placeholder object some tools create to represent an empty
/// folder: its key is the prefix itself, with or without the trailing `/`.
pub fn is_directory_marker(key: &str, prefix: &str) -> bool {
    key == prefix || key == prefix.trim_end_matches('/')
}

/// Reject keys that could escape a partition: empty or absolute keys, `.` and
/// `..` segments, and backslash separators.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let escapes = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|segment| segment == "." || segment == "..");
    if escapes {
        return Err(StorageError::InvalidKey(format!(
            "Storage key '{}' contains invalid characters",
            key
        )));
    }
    Ok(())
}

/// Region partition a key belongs to.
pub fn region_of_key(key: &str) -> Option<&str> {
    key.split_once('/')
        .map(|(region, _)| region)
        .filter(|region| !region.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_key_layout() {
        assert_eq!(
            upload_key("REGION-3", 1_718_000_000_000, "budget.pdf"),
            "REGION-3/1718000000000-budget.pdf"
        );
        assert_eq!(region_prefix("NCR"), "NCR/");
        assert_eq!(region_prefix("NCR/"), "NCR/");
    }

    #[test]
    fn directory_marker_matches_both_forms() {
        assert!(is_directory_marker("NCR/", "NCR/"));
        assert!(is_directory_marker("NCR", "NCR/"));
        assert!(!is_directory_marker("NCR/1718000000000-a.pdf", "NCR/"));
    }

    #[test]
    fn traversal_keys_are_rejected() {
        assert!(validate_key("NCR/../REGION-1/x.pdf").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("NCR/./x.pdf").is_err());
        assert!(validate_key("NCR/..").is_err());
        assert!(validate_key("NCR\\..\\REGION-1\\x.pdf").is_err());
        assert!(validate_key("NCR/1718000000000-x.pdf").is_ok());
    }

    #[test]
    fn dots_inside_a_name_are_allowed() {
        assert!(validate_key("NCR/1718000000000-v1..2.pdf").is_ok());
        assert!(validate_key("NCR/1718000000000-.hidden").is_ok());
    }

    #[test]
    fn region_is_first_segment() {
        assert_eq!(region_of_key("REGION-4A/1718000000000-x.pdf"), Some("REGION-4A"));
        assert_eq!(region_of_key("loose.pdf"), None);
        assert_eq!(region_of_key("/x.pdf"), None);
    }
}
