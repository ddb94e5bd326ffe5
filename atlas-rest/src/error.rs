//! Error type returned by the REST client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced while building, sending or checking a request
#[derive(Debug, Error)]
pub enum AtlassianError {
  /// 401 response without a JSON error body
  #[error("Unauthorized (401)")]
  Unauthorized { url: String },

  /// 4xx/5xx response; `message` holds the messages Atlassian returned
  #[error("{message}")]
  Http { status: u16, url: String, message: String },

  #[error("HTTP request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Failed to encode or decode JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Invalid header: {0}")]
  InvalidHeader(String),

  #[error("Invalid client configuration: {0}")]
  Config(String),
}

impl AtlassianError {
  /// HTTP status associated with the error, if any
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
      Self::Http { status, .. } => StatusCode::from_u16(*status).ok(),
      Self::Transport(e) => e.status(),
      _ => None,
    }
  }

  /// True for 401/403 responses
  pub fn is_auth_failure(&self) -> bool {
    matches!(
      self.status(),
      Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
    )
  }

  /// True for 404 responses
  pub fn is_not_found(&self) -> bool {
    self.status() == Some(StatusCode::NOT_FOUND)
  }
}

impl From<reqwest::header::InvalidHeaderValue> for AtlassianError {
  fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
    Self::InvalidHeader(e.to_string())
  }
}

impl From<reqwest::header::InvalidHeaderName> for AtlassianError {
  fn from(e: reqwest::header::InvalidHeaderName) -> Self {
    Self::InvalidHeader(e.to_string())
  }
}

pub type Result<T, E = AtlassianError> = std::result::Result<T, E>;
