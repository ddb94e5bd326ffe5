//! Turning Atlassian error bodies into readable messages.
//!
//! Jira, Confluence and Bitbucket disagree on the shape of their error
//! payloads. Server products send `errorMessages` (a list) alongside `errors`,
//! which can be a field→message object, an object with a single `message`, or
//! a list of objects with `message` keys. The Cloud platform gateway at
//! `api.atlassian.com` sends flat key/value objects instead.

use reqwest::StatusCode;
use serde_json::Value;

fn value_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Collect the error lines of a server-product error body.
///
/// Returns `None` when the body is not a JSON object.
pub fn product_error_lines(body: &Value) -> Option<Vec<String>> {
  let object = body.as_object()?;

  let mut lines: Vec<String> = match object.get("errorMessages") {
    Some(Value::Array(messages)) => messages.iter().map(value_text).collect(),
    _ => Vec::new(),
  };

  match object.get("errors") {
    Some(Value::Object(errors)) => match errors.get("message") {
      Some(message) => lines.push(value_text(message)),
      None => lines.extend(errors.values().map(value_text)),
    },
    Some(Value::Array(errors)) => lines.extend(errors.iter().map(|error| match error {
      Value::Object(map) => map.get("message").map(value_text).unwrap_or_default(),
      other => value_text(other),
    })),
    _ => {}
  }

  Some(lines)
}

/// Collect `key: value` lines of a Cloud gateway error body.
pub fn gateway_error_lines(body: &Value) -> Option<Vec<String>> {
  let object = body.as_object()?;
  Some(
    object
      .iter()
      .map(|(key, value)| format!("{key}: {}", value_text(value)))
      .collect(),
  )
}

/// The message used when the body says nothing useful
pub fn generic_status_message(status: StatusCode, url: &str) -> String {
  let kind = if status.is_server_error() {
    "Server Error"
  } else {
    "Client Error"
  };
  format!(
    "{} {kind}: {} for url: {url}",
    status.as_u16(),
    status.canonical_reason().unwrap_or("Unknown")
  )
}

/// Build the error message for a failed response body.
///
/// Falls back to [`generic_status_message`] when the body is not an object or
/// yields no text.
pub fn error_message(body: Option<&Value>, gateway: bool, status: StatusCode, url: &str) -> String {
  let lines = body.and_then(|body| {
    if gateway {
      gateway_error_lines(body)
    } else {
      product_error_lines(body)
    }
  });

  match lines {
    Some(lines) if lines.iter().any(|line| !line.is_empty()) => lines.join("\n"),
    _ => generic_status_message(status, url),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_error_messages_and_field_errors() {
    let body = json!({
        "errorMessages": ["Issue does not exist"],
        "errors": {"summary": "Summary is required"}
    });
    assert_eq!(
      product_error_lines(&body).unwrap(),
      vec!["Issue does not exist", "Summary is required"]
    );
  }

  #[test]
  fn test_errors_object_with_message() {
    let body = json!({"errors": {"message": "Page not found", "code": 404}});
    assert_eq!(product_error_lines(&body).unwrap(), vec!["Page not found"]);
  }

  #[test]
  fn test_errors_list() {
    let body = json!({
        "errors": [
            {"context": null, "message": "Repository does not exist", "exceptionName": "NoSuchRepositoryException"},
            "plain text",
            {"no": "message"}
        ]
    });
    assert_eq!(
      product_error_lines(&body).unwrap(),
      vec!["Repository does not exist", "plain text", ""]
    );
  }

  #[test]
  fn test_gateway_lines() {
    let body = json!({"code": 401, "message": "Unauthorized"});
    let lines = gateway_error_lines(&body).unwrap();
    assert!(lines.contains(&"code: 401".to_string()));
    assert!(lines.contains(&"message: Unauthorized".to_string()));
  }

  #[test]
  fn test_non_object_bodies_fall_back() {
    assert!(product_error_lines(&json!(["x"])).is_none());
    assert_eq!(
      error_message(Some(&json!("boom")), false, StatusCode::BAD_GATEWAY, "https://x/y"),
      "502 Server Error: Bad Gateway for url: https://x/y"
    );
    assert_eq!(
      error_message(None, false, StatusCode::NOT_FOUND, "https://x/y"),
      "404 Client Error: Not Found for url: https://x/y"
    );
  }

  #[test]
  fn test_empty_messages_fall_back() {
    let body = json!({"errorMessages": [], "errors": {}});
    assert_eq!(
      error_message(Some(&body), false, StatusCode::BAD_REQUEST, "https://x"),
      "400 Client Error: Bad Request for url: https://x"
    );
  }
}
