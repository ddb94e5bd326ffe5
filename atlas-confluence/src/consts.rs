//! Constants for the atlas-confluence client.

/// REST root on Server and Data Center
pub const SERVER_API_ROOT: &str = "rest/api";

/// REST root on Cloud, where Confluence lives under `/wiki`
pub const CLOUD_API_ROOT: &str = "wiki/rest/api";

/// Representation used when creating page bodies
pub const STORAGE_REPRESENTATION: &str = "storage";

/// Page size used by `cql` when the caller does not pick one
pub const DEFAULT_LIMIT: u32 = 25;
