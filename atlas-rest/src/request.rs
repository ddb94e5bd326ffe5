//! Per-request options and URL composition.

use reqwest::RequestBuilder;
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use url::form_urlencoded;

use crate::error::Result;
use crate::headers::HeaderPreset;

/// A file attached to a multipart request
#[derive(Debug, Clone)]
pub struct FilePart {
  /// Form field name, `file` for Atlassian attachment endpoints
  pub field: String,
  pub file_name: String,
  pub content: Vec<u8>,
  pub mime: Option<String>,
}

impl FilePart {
  pub fn new(field: &str, file_name: &str, content: Vec<u8>) -> Self {
    Self {
      field: field.to_string(),
      file_name: file_name.to_string(),
      content,
      mime: None,
    }
  }

  pub fn with_mime(mut self, mime: &str) -> Self {
    self.mime = Some(mime.to_string());
    self
  }
}

/// Request payload
#[derive(Debug, Clone, Default)]
pub enum Body {
  #[default]
  Empty,
  /// Serialized to a JSON string; the content type comes from the headers
  Json(Value),
  Text(String),
  /// `multipart/form-data` with files and plain text fields, e.g. an
  /// attachment upload with a `comment`
  Multipart {
    files: Vec<FilePart>,
    fields: Vec<(String, String)>,
  },
}

impl Body {
  /// False for payloads that are not worth sending: `null`, `{}`, `[]`, `""`
  pub fn is_present(&self) -> bool {
    match self {
      Self::Empty => false,
      Self::Json(Value::Null) => false,
      Self::Json(Value::Object(map)) => !map.is_empty(),
      Self::Json(Value::Array(items)) => !items.is_empty(),
      Self::Json(Value::String(s)) | Self::Text(s) => !s.is_empty(),
      Self::Json(_) => true,
      Self::Multipart { .. } => true,
    }
  }

  pub fn is_multipart(&self) -> bool {
    matches!(self, Self::Multipart { .. })
  }

  /// The payload as it would appear in a `curl --data` argument
  pub(crate) fn debug_data(&self) -> Option<String> {
    if !self.is_present() {
      return None;
    }
    match self {
      Self::Json(value) => Some(value.to_string()),
      Self::Text(text) => Some(text.clone()),
      Self::Empty | Self::Multipart { .. } => None,
    }
  }

  /// Attach the payload to a request builder
  pub(crate) fn apply(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
    if !self.is_present() {
      return Ok(builder);
    }

    Ok(match self {
      Self::Json(value) => builder.body(serde_json::to_string(value)?),
      Self::Text(text) => builder.body(text.clone()),
      Self::Multipart { files, fields } => {
        let mut form = Form::new();
        for (key, value) in fields {
          form = form.text(key.clone(), value.clone());
        }
        for file in files {
          let mut part = Part::bytes(file.content.clone()).file_name(file.file_name.clone());
          if let Some(mime) = &file.mime {
            part = part.mime_str(mime)?;
          }
          form = form.part(file.field.clone(), part);
        }
        builder.multipart(form)
      }
      Self::Empty => builder,
    })
  }
}

/// Everything about a request apart from its method and path
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
  pub body: Body,
  /// Query parameters, form-urlencoded in order
  pub params: Vec<(String, String)>,
  /// Bare query tokens appended verbatim after the parameters
  pub flags: Vec<String>,
  /// Replaces the default JSON headers when set
  pub headers: Option<HeaderMap>,
  /// Append a `/` to the path
  pub trailing: bool,
  /// `path` is a full URL; do not prefix the base URL
  pub absolute: bool,
  /// Return error responses instead of failing on them
  pub advanced_mode: bool,
}

impl RequestOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn json(mut self, value: Value) -> Self {
    self.body = Body::Json(value);
    self
  }

  pub fn text(mut self, text: &str) -> Self {
    self.body = Body::Text(text.to_string());
    self
  }

  pub fn file(mut self, file: FilePart) -> Self {
    self.add_parts(Some(file), None);
    self
  }

  /// Plain text field sent next to the files of a multipart body
  pub fn form_field(mut self, key: &str, value: impl ToString) -> Self {
    self.add_parts(None, Some((key.to_string(), value.to_string())));
    self
  }

  /// Switch the body to multipart, keeping parts added so far
  fn add_parts(&mut self, file: Option<FilePart>, field: Option<(String, String)>) {
    let (mut files, mut fields) = match std::mem::take(&mut self.body) {
      Body::Multipart { files, fields } => (files, fields),
      _ => (Vec::new(), Vec::new()),
    };
    files.extend(file);
    fields.extend(field);
    self.body = Body::Multipart { files, fields };
  }

  pub fn param(mut self, key: &str, value: impl ToString) -> Self {
    self.params.push((key.to_string(), value.to_string()));
    self
  }

  pub fn flag(mut self, flag: &str) -> Self {
    self.flags.push(flag.to_string());
    self
  }

  pub fn headers(mut self, headers: HeaderMap) -> Self {
    self.headers = Some(headers);
    self
  }

  pub fn preset(self, preset: HeaderPreset) -> Self {
    self.headers(preset.headers())
  }

  pub fn trailing(mut self, trailing: bool) -> Self {
    self.trailing = trailing;
    self
  }

  pub fn absolute(mut self, absolute: bool) -> Self {
    self.absolute = absolute;
    self
  }

  pub fn advanced_mode(mut self, advanced_mode: bool) -> Self {
    self.advanced_mode = advanced_mode;
    self
  }
}

/// Join URL segments with single slashes.
///
/// Each segment loses its leading and trailing `/`; a missing base is
/// skipped. With `trailing` a final `/` is appended.
pub fn url_joiner(base: Option<&str>, path: &str, trailing: bool) -> String {
  let mut joined = base
    .into_iter()
    .chain(std::iter::once(path))
    .map(|segment| segment.trim_matches('/'))
    .collect::<Vec<_>>()
    .join("/");

  if trailing {
    joined.push('/');
  }
  joined
}

/// Form-urlencode `params`, leaving commas readable for list-valued
/// parameters such as `fields=summary,status`
pub fn encode_params(params: &[(String, String)]) -> String {
  params
    .iter()
    .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
    .collect::<Vec<_>>()
    .join("&")
}

fn encode_component(raw: &str) -> String {
  form_urlencoded::byte_serialize(raw.as_bytes())
    .collect::<String>()
    .replace("%2C", ",")
}

/// Append parameters and flags to `url`.
///
/// The separator is `&` when the URL already carries a query string.
pub fn append_query(url: &mut String, params: &[(String, String)], flags: &[String]) {
  if params.is_empty() && flags.is_empty() {
    return;
  }

  url.push(if url.contains('?') { '&' } else { '?' });

  if !params.is_empty() {
    url.push_str(&encode_params(params));
  }
  if !flags.is_empty() {
    if !params.is_empty() {
      url.push('&');
    }
    url.push_str(&flags.join("&"));
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_url_joiner_strips_slashes() {
    assert_eq!(
      url_joiner(Some("https://jira.example.com/"), "/rest/api/2/issue/", false),
      "https://jira.example.com/rest/api/2/issue"
    );
    assert_eq!(
      url_joiner(Some("https://jira.example.com"), "rest/api/2/issue", true),
      "https://jira.example.com/rest/api/2/issue/"
    );
    assert_eq!(
      url_joiner(None, "https://other.example.com/download/", false),
      "https://other.example.com/download"
    );
  }

  #[test]
  fn test_encode_params_keeps_commas() {
    let params = vec![
      ("jql".to_string(), "project = TEST order by created".to_string()),
      ("fields".to_string(), "summary,status".to_string()),
    ];
    assert_eq!(
      encode_params(&params),
      "jql=project+%3D+TEST+order+by+created&fields=summary,status"
    );
  }

  #[test]
  fn test_append_query_params_and_flags() {
    let mut url = "https://x/rest".to_string();
    append_query(
      &mut url,
      &[("expand".to_string(), "body.storage".to_string())],
      &["minimal".to_string(), "limit=5".to_string()],
    );
    assert_eq!(url, "https://x/rest?expand=body.storage&minimal&limit=5");
  }

  #[test]
  fn test_append_query_to_existing_query() {
    let mut url = "https://x/rest?a=1".to_string();
    append_query(&mut url, &[], &["flag".to_string()]);
    assert_eq!(url, "https://x/rest?a=1&flag");

    let mut url = "https://x/rest?a=1".to_string();
    append_query(&mut url, &[("b".to_string(), "2".to_string())], &[]);
    assert_eq!(url, "https://x/rest?a=1&b=2");
  }

  #[test]
  fn test_append_query_nothing_to_add() {
    let mut url = "https://x/rest".to_string();
    append_query(&mut url, &[], &[]);
    assert_eq!(url, "https://x/rest");
  }

  #[test]
  fn test_body_presence() {
    assert!(!Body::Empty.is_present());
    assert!(!Body::Json(Value::Null).is_present());
    assert!(!Body::Json(json!({})).is_present());
    assert!(!Body::Json(json!([])).is_present());
    assert!(!Body::Json(json!("")).is_present());
    assert!(!Body::Text(String::new()).is_present());
    assert!(Body::Json(json!({"a": 1})).is_present());
    assert!(Body::Json(json!(0)).is_present());
    assert!(
      Body::Multipart {
        files: vec![],
        fields: vec![]
      }
      .is_present()
    );
  }

  #[test]
  fn test_options_file_accumulates_parts() {
    let opts = RequestOptions::new()
      .file(FilePart::new("file", "a.txt", b"a".to_vec()))
      .form_field("minorEdit", true)
      .file(FilePart::new("file", "b.txt", b"b".to_vec()).with_mime("text/plain"))
      .form_field("comment", "two files");

    match opts.body {
      Body::Multipart { files, fields } => {
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].mime.as_deref(), Some("text/plain"));
        assert_eq!(
          fields,
          vec![
            ("minorEdit".to_string(), "true".to_string()),
            ("comment".to_string(), "two files".to_string()),
          ]
        );
      }
      other => panic!("unexpected body {other:?}"),
    }
  }
}
