//! # Jira API Client
//!
//! Jira REST API integration for issues, JQL search, comments and
//! transitions, layered on the shared `atlas-rest` client.

mod client;
pub mod consts;
mod endpoints;
pub mod models;

// Re-export the client
pub use client::{JiraClient, create_jira_client};
// Re-export models
pub use models::{
  CreatedIssue, JiraComment, JiraIssue, JiraIssueFields, JiraIssueStatus, JiraIssueType, JiraSearchResults,
  JiraStatusCategory, JiraTransition, JiraTransitions, JiraUser, TransitionId, TransitionRequest,
};
