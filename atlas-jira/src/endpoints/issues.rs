//! # Jira Issue Endpoints
//!
//! Jira API endpoint implementations for issue operations,
//! including fetching, creating, and commenting on Jira issues.

use anyhow::{Context, Result};
use atlas_rest::{AtlassianError, Method, RequestOptions};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::{JiraClient, auth_error, issue_error};
use crate::models::{CommentRequest, CreateIssueRequest, CreatedIssue, JiraComment, JiraIssue};

impl JiraClient {
  /// Get a Jira issue by key
  pub async fn get_issue(&self, issue_key: &str) -> Result<JiraIssue> {
    self
      .rest
      .get_json(&self.resource(&format!("issue/{issue_key}")), RequestOptions::new())
      .await
      .map_err(|e| issue_error(e, issue_key, "Failed to fetch Jira issue"))
  }

  /// Check whether an issue exists and is visible to the current user
  pub async fn issue_exists(&self, issue_key: &str) -> Result<bool> {
    let opts = RequestOptions::new().param("fields", "*none");
    match self
      .rest
      .get(&self.resource(&format!("issue/{issue_key}")), opts)
      .await
    {
      Ok(_) => Ok(true),
      Err(e) if e.is_not_found() => {
        debug!("Issue {issue_key} does not exist");
        Ok(false)
      }
      Err(e) => Err(auth_error(e, "Failed to check Jira issue")),
    }
  }

  /// Create an issue from raw `fields`, e.g. `{"project": {"key": "P"}, ...}`
  pub async fn create_issue(&self, fields: Map<String, Value>) -> Result<CreatedIssue> {
    let payload = serde_json::to_value(CreateIssueRequest { fields }).context("Failed to encode issue")?;
    self
      .rest
      .send_json(Method::POST, &self.resource("issue"), RequestOptions::new().json(payload))
      .await
      .map_err(|e| match e {
        AtlassianError::Http { status: 400, .. } => {
          anyhow::Error::new(e).context("Jira rejected the issue fields")
        }
        other => auth_error(other, "Failed to create Jira issue"),
      })
  }

  /// Add a plain-text comment to an issue
  pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<JiraComment> {
    let payload = serde_json::to_value(CommentRequest {
      body: body.to_string(),
    })
    .context("Failed to encode comment")?;

    self
      .rest
      .send_json(
        Method::POST,
        &self.resource(&format!("issue/{issue_key}/comment")),
        RequestOptions::new().json(payload),
      )
      .await
      .map_err(|e| issue_error(e, issue_key, "Failed to add Jira comment"))
  }
}
