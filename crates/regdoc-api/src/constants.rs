//! API constants

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

pub const API_VERSION: &str = "v0";

/// Versioned prefix every protected route is mounted under
pub const API_PREFIX: &str = "/api/v0";

/// Multipart field carrying the uploaded document
pub const UPLOAD_FIELD: &str = "file";

/// Extra body allowance on top of the file limit for multipart framing
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
