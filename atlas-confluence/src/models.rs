use serde::{Deserialize, Serialize};

/// A page, blog post or other piece of content
#[derive(Debug, Clone, Deserialize)]
pub struct ConfluencePage {
  pub id: String,
  pub title: String,
  #[serde(rename = "type")]
  pub content_type: String,
  pub status: Option<String>,
  pub space: Option<ConfluenceSpace>,
  pub body: Option<PageBody>,
  pub version: Option<ContentVersion>,
  #[serde(rename = "_links")]
  pub links: Option<ContentLinks>,
}

impl ConfluencePage {
  /// Storage-format body, present when requested with `expand=body.storage`
  pub fn storage(&self) -> Option<&str> {
    self.body.as_ref()?.storage.as_ref().map(|s| s.value.as_str())
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageBody {
  pub storage: Option<StorageValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageValue {
  pub value: String,
  pub representation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentVersion {
  pub number: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentLinks {
  /// Path of the page in the web UI, relative to the site
  pub webui: Option<String>,
}

/// Represents a Confluence space
#[derive(Debug, Clone, Deserialize)]
pub struct ConfluenceSpace {
  pub id: Option<u64>,
  pub key: String,
  pub name: Option<String>,
  #[serde(rename = "type")]
  pub space_type: Option<String>,
}

/// One page of content results
#[derive(Debug, Deserialize)]
pub struct ContentResults {
  pub results: Vec<ConfluencePage>,
  #[serde(default)]
  pub start: u32,
  #[serde(default)]
  pub limit: u32,
  #[serde(default)]
  pub size: u32,
  /// Only returned by CQL searches
  #[serde(rename = "totalSize")]
  pub total_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpaceRef {
  pub key: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AncestorRef {
  pub id: String,
}

/// Request body for creating a page
#[derive(Debug, Serialize)]
pub(crate) struct CreatePageRequest {
  #[serde(rename = "type")]
  pub content_type: &'static str,
  pub title: String,
  pub space: SpaceRef,
  pub body: PageBody,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub ancestors: Vec<AncestorRef>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_page_deserialization() {
    let page: ConfluencePage = serde_json::from_value(json!({
        "id": "65538",
        "type": "page",
        "status": "current",
        "title": "Release notes",
        "space": {"id": 98305, "key": "DOCS", "name": "Documentation", "type": "global"},
        "body": {"storage": {"value": "<p>Hi</p>", "representation": "storage"}},
        "version": {"number": 3},
        "_links": {"webui": "/display/DOCS/Release+notes"}
    }))
    .unwrap();

    assert_eq!(page.title, "Release notes");
    assert_eq!(page.content_type, "page");
    assert_eq!(page.storage(), Some("<p>Hi</p>"));
    assert_eq!(page.version.map(|v| v.number), Some(3));
    assert_eq!(page.space.map(|s| s.key), Some("DOCS".to_string()));
    assert_eq!(
      page.links.and_then(|l| l.webui).as_deref(),
      Some("/display/DOCS/Release+notes")
    );
  }

  #[test]
  fn test_create_page_request_omits_empty_ancestors() {
    let request = CreatePageRequest {
      content_type: "page",
      title: "New".to_string(),
      space: SpaceRef { key: "DOCS".to_string() },
      body: PageBody {
        storage: Some(StorageValue {
          value: "<p>x</p>".to_string(),
          representation: "storage".to_string(),
        }),
      },
      ancestors: vec![],
    };

    assert_eq!(
      serde_json::to_value(&request).unwrap(),
      json!({
          "type": "page",
          "title": "New",
          "space": {"key": "DOCS"},
          "body": {"storage": {"value": "<p>x</p>", "representation": "storage"}}
      })
    );
  }
}
