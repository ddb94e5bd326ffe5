//! JQL search.

use anyhow::Result;
use atlas_rest::{Method, RequestOptions};
use serde_json::json;

use crate::client::{JiraClient, auth_error};
use crate::consts::DEFAULT_MAX_RESULTS;
use crate::models::JiraSearchResults;

impl JiraClient {
  /// Run a JQL query and return one page of results.
  ///
  /// `fields` limits the returned issue fields; an empty slice leaves the
  /// server default. `max_results` of `None` uses [`DEFAULT_MAX_RESULTS`].
  pub async fn search_issues(
    &self,
    jql: &str,
    start_at: u32,
    max_results: Option<u32>,
    fields: &[&str],
  ) -> Result<JiraSearchResults> {
    let mut payload = json!({
        "jql": jql,
        "startAt": start_at,
        "maxResults": max_results.unwrap_or(DEFAULT_MAX_RESULTS),
    });
    if !fields.is_empty() {
      payload["fields"] = json!(fields);
    }

    self
      .rest
      .send_json(Method::POST, &self.resource("search"), RequestOptions::new().json(payload))
      .await
      .map_err(|e| auth_error(e, "Failed to search Jira issues"))
  }
}
