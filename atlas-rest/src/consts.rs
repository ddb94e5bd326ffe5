//! Constants for the atlas-rest client

/// User-Agent header value sent with every request
pub const USER_AGENT: &str = concat!("atlas/", env!("CARGO_PKG_VERSION"));

/// Request timeout applied when none is configured
pub const DEFAULT_TIMEOUT_SECS: f64 = 75.0;

/// Path prefix shared by the Jira and Confluence REST APIs
pub const DEFAULT_API_ROOT: &str = "rest/api";

/// API version segment used when none is configured
pub const DEFAULT_API_VERSION: &str = "latest";

/// Status codes retried with exponential backoff: payload too large, too many
/// requests, service unavailable
pub const DEFAULT_RETRY_STATUS_CODES: [u16; 3] = [413, 429, 503];

/// Upper bound for a single backoff sleep, in seconds
pub const DEFAULT_MAX_BACKOFF_SECONDS: f64 = 1800.0;

/// Upper bound for the number of retries of one request
pub const DEFAULT_MAX_BACKOFF_RETRIES: u32 = 1000;

/// Exact content type Atlassian uses for JSON error bodies. A 401 carrying any
/// other content type is treated as a bare authentication failure.
pub const JSON_UTF8_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
