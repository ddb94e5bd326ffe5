//! Constants for the atlas-jira client.

/// REST API version used for every Jira call
pub const JIRA_API_VERSION: &str = "2";

/// Page size used by `search_issues` when the caller does not pick one
pub const DEFAULT_MAX_RESULTS: u32 = 50;
