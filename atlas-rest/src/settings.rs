//! Serializable client settings.
//!
//! Every field has a default so partially filled TOML tables deserialize.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
  DEFAULT_API_ROOT, DEFAULT_API_VERSION, DEFAULT_MAX_BACKOFF_RETRIES, DEFAULT_MAX_BACKOFF_SECONDS,
  DEFAULT_RETRY_STATUS_CODES, DEFAULT_TIMEOUT_SECS,
};

/// Retry and backoff behaviour for failed requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
  /// Retry responses whose status is in `status_codes`, sleeping with
  /// exponential backoff between attempts
  pub enabled: bool,
  pub status_codes: Vec<u16>,
  pub max_backoff_seconds: f64,
  pub max_retries: u32,
  /// Multiplier for `2^(retry - 1)`
  pub backoff_factor: f64,
  /// Upper bound of the uniform random delay added to every backoff
  pub backoff_jitter: f64,
  /// Honour `Retry-After` on 429 responses, even when `enabled` is false
  pub retry_with_header: bool,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      enabled: false,
      status_codes: DEFAULT_RETRY_STATUS_CODES.to_vec(),
      max_backoff_seconds: DEFAULT_MAX_BACKOFF_SECONDS,
      max_retries: DEFAULT_MAX_BACKOFF_RETRIES,
      backoff_factor: 1.0,
      backoff_jitter: 1.0,
      retry_with_header: true,
    }
  }
}

/// Connection settings for a [`RestClient`](crate::RestClient)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
  /// Per-request timeout; fractions of a second are kept
  pub timeout_secs: f64,
  pub api_root: String,
  pub api_version: String,
  pub verify_ssl: bool,
  /// The instance is an Atlassian Cloud site
  pub cloud: bool,
  /// Skip status checking in [`RestClient::request`](crate::RestClient::request)
  pub advanced_mode: bool,
  /// Proxy URL used for every scheme
  #[serde(skip_serializing_if = "Option::is_none")]
  pub proxy: Option<String>,
  pub retry: RetryPolicy,
}

impl ClientSettings {
  /// `timeout_secs` as a [`Duration`]; invalid values fall back to the default
  pub fn timeout(&self) -> Duration {
    Duration::try_from_secs_f64(self.timeout_secs)
      .ok()
      .filter(|timeout| !timeout.is_zero())
      .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
  }
}

impl Default for ClientSettings {
  fn default() -> Self {
    Self {
      timeout_secs: DEFAULT_TIMEOUT_SECS,
      api_root: DEFAULT_API_ROOT.to_string(),
      api_version: DEFAULT_API_VERSION.to_string(),
      verify_ssl: true,
      cloud: false,
      advanced_mode: false,
      proxy: None,
      retry: RetryPolicy::default(),
    }
  }
}
