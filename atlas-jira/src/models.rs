use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents a Jira user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
  /// Cloud identifier
  pub account_id: Option<String>,
  /// Server/Data Center username
  pub name: Option<String>,
  pub display_name: String,
  pub email_address: Option<String>,
}

impl JiraUser {
  /// Account id on Cloud, username on Server
  pub fn identifier(&self) -> Option<&str> {
    self.account_id.as_deref().or(self.name.as_deref())
  }
}

/// Represents a Jira issue
#[derive(Debug, Deserialize)]
pub struct JiraIssue {
  pub id: String,
  pub key: String,
  #[serde(default)]
  pub fields: JiraIssueFields,
}

/// Represents Jira issue fields.
///
/// A search with a `fields` list only returns the requested fields, so every
/// field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JiraIssueFields {
  pub summary: String,
  pub description: Option<String>,
  pub status: Option<JiraIssueStatus>,
  pub assignee: Option<JiraUser>,
  pub issuetype: Option<JiraIssueType>,
}

impl JiraIssueFields {
  pub fn status_name(&self) -> Option<&str> {
    self.status.as_ref().map(|s| s.name.as_str())
  }
}

/// Represents a Jira issue status
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueStatus {
  pub id: Option<String>,
  pub name: String,
  pub status_category: Option<JiraStatusCategory>,
}

/// Coarse grouping of a status: `new`, `indeterminate` or `done`
#[derive(Debug, Clone, Deserialize)]
pub struct JiraStatusCategory {
  pub key: String,
  pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssueType {
  pub name: String,
}

/// One page of a JQL search
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraSearchResults {
  #[serde(default)]
  pub start_at: u32,
  #[serde(default)]
  pub max_results: u32,
  #[serde(default)]
  pub total: u32,
  pub issues: Vec<JiraIssue>,
}

/// Response to an issue creation
#[derive(Debug, Deserialize)]
pub struct CreatedIssue {
  pub id: String,
  pub key: String,
  #[serde(rename = "self")]
  pub self_url: Option<String>,
}

/// Represents a comment on an issue
#[derive(Debug, Deserialize)]
pub struct JiraComment {
  pub id: String,
  pub body: String,
  pub author: Option<JiraUser>,
}

/// Request body for adding a comment
#[derive(Debug, Serialize)]
pub struct CommentRequest {
  pub body: String,
}

/// Request body for creating an issue.
///
/// `fields` is passed through untouched so custom fields can be set.
#[derive(Debug, Serialize)]
pub struct CreateIssueRequest {
  pub fields: Map<String, Value>,
}

/// Represents a Jira transition
#[derive(Debug, Clone, Deserialize)]
pub struct JiraTransition {
  pub id: String,
  pub name: String,
  /// Status the issue moves to
  pub to: Option<JiraIssueStatus>,
}

/// Represents a list of Jira transitions
#[derive(Debug, Deserialize)]
pub struct JiraTransitions {
  pub transitions: Vec<JiraTransition>,
}

/// Represents a transition request payload
#[derive(Debug, Serialize)]
pub struct TransitionRequest {
  pub transition: TransitionId,
}

/// Represents a transition ID for the request
#[derive(Debug, Serialize)]
pub struct TransitionId {
  pub id: String,
}
