use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::region::{is_all_regions, RegionSet};

/// Access role carried by the identity provider.
///
/// Wire tags are `admin` and `super-admin`; any other tag is read as `admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(from = "String")]
pub enum UserRole {
    #[default]
    #[serde(rename = "admin")]
    RegionalAdmin,
    #[serde(rename = "super-admin")]
    SuperAdmin,
}

impl UserRole {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "super-admin" => UserRole::SuperAdmin,
            _ => UserRole::RegionalAdmin,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            UserRole::RegionalAdmin => "admin",
            UserRole::SuperAdmin => "super-admin",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }
}

impl From<String> for UserRole {
    fn from(tag: String) -> Self {
        UserRole::from_tag(&tag)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Identity of the caller for one session. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserContext {
    /// Region code, or `ALL` for users that span every partition.
    pub region: String,
    pub role: UserRole,
    /// Display label, usually the e-mail address.
    pub identity: String,
}

impl UserContext {
    pub fn new(region: impl Into<String>, role: UserRole, identity: Option<String>) -> Self {
        Self {
            region: region.into(),
            role,
            identity: identity
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "User".to_string()),
        }
    }

    /// Whether this user may read documents stored under `region`.
    pub fn can_access_region(&self, region: &str, regions: &RegionSet) -> bool {
        match self.role {
            UserRole::SuperAdmin => regions.contains(region),
            UserRole::RegionalAdmin => self.region == region,
        }
    }

    /// Partition uploads go to, if this user has one.
    pub fn upload_region(&self) -> Option<&str> {
        if is_all_regions(&self.region) || self.region.trim().is_empty() {
            None
        } else {
            Some(&self.region)
        }
    }
}
