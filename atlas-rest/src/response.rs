//! Buffered responses and helpers for digging values out of them.

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

/// A fully received HTTP response
#[derive(Debug, Clone)]
pub struct RestResponse {
  pub(crate) method: Method,
  pub(crate) url: String,
  pub(crate) status: StatusCode,
  pub(crate) headers: HeaderMap,
  pub(crate) body: Bytes,
}

impl RestResponse {
  pub fn method(&self) -> &Method {
    &self.method
  }

  /// Final URL the request was sent to, query string included
  pub fn url(&self) -> &str {
    &self.url
  }

  pub fn status(&self) -> StatusCode {
    self.status
  }

  pub fn headers(&self) -> &HeaderMap {
    &self.headers
  }

  pub fn content_type(&self) -> Option<&str> {
    self.headers.get(CONTENT_TYPE)?.to_str().ok()
  }

  pub fn bytes(&self) -> &Bytes {
    &self.body
  }

  pub fn into_bytes(self) -> Bytes {
    self.body
  }

  /// Body decoded as UTF-8, invalid sequences replaced
  pub fn text(&self) -> String {
    String::from_utf8_lossy(&self.body).into_owned()
  }

  pub fn is_empty(&self) -> bool {
    self.body.is_empty()
  }

  pub fn json(&self) -> Result<Value> {
    Ok(serde_json::from_slice(&self.body)?)
  }

  pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
    Ok(serde_json::from_slice(&self.body)?)
  }
}

/// Decoded body of a GET request
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
  /// The server sent no body
  Empty,
  Json(Value),
  /// The body was not valid JSON
  Text(String),
}

impl Content {
  pub fn as_json(&self) -> Option<&Value> {
    match self {
      Self::Json(value) => Some(value),
      _ => None,
    }
  }

  pub fn into_json(self) -> Option<Value> {
    match self {
      Self::Json(value) => Some(value),
      _ => None,
    }
  }

  pub fn is_empty(&self) -> bool {
    matches!(self, Self::Empty)
  }
}

/// One step of a chained lookup, with the value to use if the key is absent
#[derive(Debug, Clone)]
pub struct Field {
  pub name: String,
  pub default: Option<Value>,
}

impl Field {
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      default: None,
    }
  }

  pub fn or(name: &str, default: Value) -> Self {
    Self {
      name: name.to_string(),
      default: Some(default),
    }
  }
}

/// Walk `fields` through nested objects.
///
/// A missing key, or a non-object in the middle of the walk, yields the
/// field's default, or `null` when none was given.
pub fn extract_fields(value: Value, fields: &[Field]) -> Value {
  fields.iter().fold(value, |current, field| {
    let found = match current {
      Value::Object(mut map) => map.remove(&field.name),
      _ => None,
    };
    found.or_else(|| field.default.clone()).unwrap_or(Value::Null)
  })
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_extract_fields_nested() {
    let value = json!({"fields": {"status": {"name": "Done"}}});
    let name = extract_fields(value, &[Field::new("fields"), Field::new("status"), Field::new("name")]);
    assert_eq!(name, json!("Done"));
  }

  #[test]
  fn test_extract_fields_defaults() {
    let value = json!({"results": []});
    let size = extract_fields(value.clone(), &[Field::or("size", json!(0))]);
    assert_eq!(size, json!(0));

    let missing = extract_fields(value, &[Field::new("page"), Field::new("title")]);
    assert_eq!(missing, Value::Null);
  }

  #[test]
  fn test_response_text_and_json() {
    let response = RestResponse {
      method: Method::GET,
      url: "https://x".to_string(),
      status: StatusCode::OK,
      headers: HeaderMap::new(),
      body: Bytes::from_static(br#"{"key":"TEST-1"}"#),
    };
    assert_eq!(response.text(), r#"{"key":"TEST-1"}"#);
    assert_eq!(response.json().unwrap()["key"], "TEST-1");
    assert!(response.content_type().is_none());
    assert!(!response.is_empty());
  }
}
