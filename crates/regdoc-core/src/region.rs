//! Region enumeration
//!
//! Region codes are both the storage path prefix and the authorization scope.
//! The set is owned by configuration and passed to every component that needs
//! to enumerate or validate regions.

use serde::{Deserialize, Serialize};

/// Sentinel region carried by users who may see every partition.
pub const ALL_REGIONS: &str = "ALL";

const DEFAULT_REGIONS: [&str; 15] = [
    "NCR",
    "REGION-1",
    "REGION-2",
    "REGION-3",
    "REGION-4A",
    "REGION-4B",
    "REGION-5",
    "REGION-6",
    "REGION-7",
    "REGION-8",
    "REGION-9",
    "REGION-10",
    "REGION-11",
    "REGION-12",
    "REGION-13",
];

/// Ordered, de-duplicated set of region codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionSet(Vec<String>);

impl RegionSet {
    /// Build a set from codes, trimming whitespace and dropping blanks,
    /// duplicates and the `ALL` sentinel. Order of first occurrence is kept.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut regions: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim();
            if code.is_empty() || code.eq_ignore_ascii_case(ALL_REGIONS) {
                continue;
            }
            if !regions.iter().any(|r| r == code) {
                regions.push(code.to_string());
            }
        }
        Self(regions)
    }

    /// Parse a comma-separated list such as the `REGIONS` environment variable.
    pub fn parse(list: &str) -> Result<Self, anyhow::Error> {
        let set = Self::new(list.split(','));
        if set.is_empty() {
            return Err(anyhow::anyhow!(
                "REGIONS must contain at least one region code"
            ));
        }
        Ok(set)
    }

    pub fn contains(&self, region: &str) -> bool {
        self.0.iter().any(|r| r == region)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RegionSet {
    fn default() -> Self {
        Self::new(DEFAULT_REGIONS)
    }
}

/// True when `region` is the `ALL` sentinel.
pub fn is_all_regions(region: &str) -> bool {
    region.trim().eq_ignore_ascii_case(ALL_REGIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_matches_administrative_listing() {
        let regions = RegionSet::default();
        assert_eq!(regions.len(), 15);
        let codes: Vec<&str> = regions.iter().collect();
        assert_eq!(codes[0], "NCR");
        assert_eq!(codes[4], "REGION-4A");
        assert_eq!(codes[5], "REGION-4B");
        assert_eq!(codes[14], "REGION-13");
    }

    #[test]
    fn parse_trims_and_deduplicates() {
        let regions = RegionSet::parse(" NCR, REGION-1 ,NCR,,ALL").unwrap();
        assert_eq!(regions.as_slice(), &["NCR".to_string(), "REGION-1".to_string()]);
    }

    #[test]
    fn parse_rejects_empty_list() {
        assert!(RegionSet::parse(" , ").is_err());
        assert!(RegionSet::parse("ALL").is_err());
    }

    #[test]
    fn contains_is_exact() {
        let regions = RegionSet::default();
        assert!(regions.contains("REGION-3"));
        assert!(!regions.contains("region-3"));
        assert!(!regions.contains(ALL_REGIONS));
    }

    #[test]
    fn all_sentinel_is_case_insensitive() {
        assert!(is_all_regions("ALL"));
        assert!(is_all_regions(" all "));
        assert!(!is_all_regions("NCR"));
    }
}
