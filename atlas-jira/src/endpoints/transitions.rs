use anyhow::{Context, Result};
use atlas_rest::{AtlassianError, RequestOptions};

use crate::client::{JiraClient, issue_error};
use crate::models::{JiraTransition, JiraTransitions, TransitionId, TransitionRequest};

impl JiraClient {
  /// Get available transitions for an issue
  pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<JiraTransition>> {
    let transitions: JiraTransitions = self
      .rest
      .get_json(
        &self.resource(&format!("issue/{issue_key}/transitions")),
        RequestOptions::new(),
      )
      .await
      .map_err(|e| issue_error(e, issue_key, "Failed to fetch Jira transitions"))?;

    Ok(transitions.transitions)
  }

  /// Find a transition by id or (case-insensitive) name
  pub async fn find_transition(&self, issue_key: &str, name_or_id: &str) -> Result<Option<JiraTransition>> {
    let transitions = self.get_transitions(issue_key).await?;
    Ok(
      transitions
        .into_iter()
        .find(|t| t.id == name_or_id || t.name.eq_ignore_ascii_case(name_or_id)),
    )
  }

  /// Transition an issue to a new status
  pub async fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<()> {
    let payload = TransitionRequest {
      transition: TransitionId {
        id: transition_id.to_string(),
      },
    };
    let payload = serde_json::to_value(&payload).context("Failed to encode transition")?;

    self
      .rest
      .post(
        &self.resource(&format!("issue/{issue_key}/transitions")),
        RequestOptions::new().json(payload),
      )
      .await
      .map_err(|e| match e {
        AtlassianError::Http { status: 400, .. } => anyhow::anyhow!(
          "Invalid transition. The transition may not be available for the current status."
        ),
        other => issue_error(other, issue_key, "Failed to transition Jira issue"),
      })?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{basic_auth, body_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::create_jira_client;

  fn transitions_body() -> serde_json::Value {
    serde_json::json!({
        "transitions": [
            {
                "id": "11",
                "name": "To Do"
            },
            {
                "id": "21",
                "name": "In Progress"
            },
            {
                "id": "31",
                "name": "Done"
            }
        ]
    })
  }

  #[tokio::test]
  async fn test_get_transitions() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    // Mock response for transitions
    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123/transitions"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(transitions_body()))
      .mount(&mock_server)
      .await;

    let transitions = client.get_transitions("TEST-123").await?;
    assert_eq!(transitions.len(), 3);
    assert_eq!(transitions[0].id, "11");
    assert_eq!(transitions[0].name, "To Do");
    assert_eq!(transitions[2].id, "31");
    assert_eq!(transitions[2].name, "Done");

    Ok(())
  }

  #[tokio::test]
  async fn test_find_transition_by_name_or_id() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123/transitions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(transitions_body()))
      .mount(&mock_server)
      .await;

    let by_name = client.find_transition("TEST-123", "in progress").await?;
    assert_eq!(by_name.map(|t| t.id), Some("21".to_string()));

    let by_id = client.find_transition("TEST-123", "31").await?;
    assert_eq!(by_id.map(|t| t.name), Some("Done".to_string()));

    assert!(client.find_transition("TEST-123", "Rejected").await?.is_none());
    Ok(())
  }

  #[tokio::test]
  async fn test_transition_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    // Mock response for transition
    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/TEST-123/transitions"))
      .and(basic_auth("test_user", "test_token"))
      .and(body_json(serde_json::json!({
          "transition": {
              "id": "21"
          }
      })))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    let result = client.transition_issue("TEST-123", "21").await;
    assert!(result.is_ok());

    Ok(())
  }

  #[tokio::test]
  async fn test_transition_issue_invalid_transition() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    // Mock response for invalid transition
    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/TEST-123/transitions"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
          "errorMessages": ["The requested transition is not available for the current status."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let result = client.transition_issue("TEST-123", "invalid").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid transition"));

    Ok(())
  }

  #[tokio::test]
  async fn test_transitions_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    // Mock 404 response
    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/NONEXISTENT-123/transitions"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
          "errorMessages": ["Issue does not exist or you do not have permission to see it."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let result = client.get_transitions("NONEXISTENT-123").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));

    Ok(())
  }

  #[tokio::test]
  async fn test_transitions_unauthorized() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "invalid_token")?;

    // Mock unauthorized response
    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123/transitions"))
      .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
          "errorMessages": ["Authentication failed"],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let result = client.get_transitions("TEST-123").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Authentication failed"));

    Ok(())
  }
}
