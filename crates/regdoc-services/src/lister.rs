//! Access-scoped document lister.
//!
//! Super administrators see every configured region; regional administrators
//! see their own partition only. Each region is listed independently so one
//! failing partition never hides the others.

use futures::future::join_all;
use regdoc_core::models::{Document, DocumentStats, UserContext, UserRole};
use regdoc_core::region::is_all_regions;
use regdoc_core::{format_file_size, AppError, RegionSet};
use regdoc_storage::keys::{is_directory_marker, region_of_key, region_prefix, validate_key};
use regdoc_storage::ObjectStorage;
use std::collections::HashSet;
use std::sync::Arc;

/// Listing result of one region partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionListing {
    pub region: String,
    /// Documents in storage order, or the failure message
    pub outcome: Result<Vec<Document>, String>,
}

impl RegionListing {
    pub fn is_failed(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Per-region listings in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentListing {
    regions: Vec<RegionListing>,
}

impl DocumentListing {
    pub fn new(regions: Vec<RegionListing>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[RegionListing] {
        &self.regions
    }

    /// Documents of every region that listed successfully, concatenated in
    /// region order. Failed regions contribute nothing.
    pub fn documents(&self) -> Vec<Document> {
        self.regions
            .iter()
            .filter_map(|listing| listing.outcome.as_ref().ok())
            .flatten()
            .cloned()
            .collect()
    }

    /// Regions whose listing failed, with the failure message
    pub fn failed_regions(&self) -> Vec<(&str, &str)> {
        self.regions
            .iter()
            .filter_map(|listing| match &listing.outcome {
                Err(message) => Some((listing.region.as_str(), message.as_str())),
                Ok(_) => None,
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.regions.iter().all(|listing| !listing.is_failed())
    }
}

#[derive(Clone)]
pub struct DocumentLister {
    storage: Arc<dyn ObjectStorage>,
    regions: RegionSet,
}

impl DocumentLister {
    pub fn new(storage: Arc<dyn ObjectStorage>, regions: RegionSet) -> Self {
        Self { storage, regions }
    }

    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    /// Regions a user's listing covers, in enumeration order
    pub fn regions_for(&self, user: &UserContext) -> Vec<String> {
        match user.role {
            UserRole::SuperAdmin => self.regions.iter().map(String::from).collect(),
            UserRole::RegionalAdmin => vec![user.region.clone()],
        }
    }

    pub async fn list_documents(&self, user: &UserContext) -> DocumentListing {
        let start = std::time::Instant::now();
        let regions = self.regions_for(user);

        let listings = join_all(regions.iter().map(|region| self.list_region(region))).await;
        let listing = DocumentListing::new(listings);

        tracing::info!(
            identity = %user.identity,
            role = %user.role,
            regions = regions.len(),
            failed_regions = listing.failed_regions().len(),
            documents = listing.documents().len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Document listing complete"
        );

        listing
    }

    pub async fn list_region(&self, region: &str) -> RegionListing {
        let prefix = region_prefix(region);

        let outcome = match self.storage.list(&prefix).await {
            Ok(objects) => Ok(objects
                .into_iter()
                .filter(|object| !is_directory_marker(&object.key, &prefix))
                .map(|object| {
                    Document::from_listing(region, object.key, object.size, object.last_modified)
                })
                .collect()),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    region = %region,
                    prefix = %prefix,
                    "Region listing failed"
                );
                Err(e.to_string())
            }
        };

        RegionListing {
            region: region.to_string(),
            outcome,
        }
    }

    /// Look up one document the user may read. Region access is checked
    /// before storage is touched.
    pub async fn find_document(&self, user: &UserContext, key: &str) -> Result<Document, AppError> {
        validate_key(key)?;
        let region = region_of_key(key).ok_or_else(|| {
            AppError::InvalidInput(format!("Key '{}' is not inside a region partition", key))
        })?;

        if !user.can_access_region(region, &self.regions) {
            tracing::debug!(
                identity = %user.identity,
                region = %region,
                key = %key,
                "Document access denied"
            );
            return Err(AppError::Forbidden(format!("No access to region {}", region)));
        }

        let object = self.storage.head(key).await?;
        Ok(Document::from_listing(
            region,
            object.key,
            object.size,
            object.last_modified,
        ))
    }
}

/// Apply the workspace filters: the region filter is honoured for super
/// administrators only (`ALL` or none means no filter), then a
/// case-insensitive substring search over name and region.
pub fn filter_documents(
    docs: &[Document],
    user: &UserContext,
    region_filter: Option<&str>,
    search: Option<&str>,
) -> Vec<Document> {
    let region_filter = region_filter
        .map(str::trim)
        .filter(|r| !r.is_empty() && !is_all_regions(r))
        .filter(|_| user.role.is_super_admin());
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    docs.iter()
        .filter(|doc| region_filter.map_or(true, |region| doc.region == region))
        .filter(|doc| {
            needle.as_ref().map_or(true, |needle| {
                doc.name.to_lowercase().contains(needle.as_str())
                    || doc.region.to_lowercase().contains(needle.as_str())
            })
        })
        .cloned()
        .collect()
}

pub fn document_stats(docs: &[Document]) -> DocumentStats {
    let regions: HashSet<&str> = docs.iter().map(|doc| doc.region.as_str()).collect();
    let total_size_bytes: u64 = docs.iter().map(|doc| doc.size_bytes).sum();

    DocumentStats {
        total: docs.len(),
        regions: regions.len(),
        total_size_bytes,
        total_size_label: format_file_size(total_size_bytes),
    }
}
