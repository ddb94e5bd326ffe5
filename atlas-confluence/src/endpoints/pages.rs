//! # Confluence Page Endpoints

use anyhow::{Context, Result};
use atlas_rest::{Method, RequestOptions};

use crate::client::{ConfluenceClient, auth_error, not_found_error};
use crate::consts::STORAGE_REPRESENTATION;
use crate::models::{
  AncestorRef, ConfluencePage, ContentResults, CreatePageRequest, PageBody, SpaceRef, StorageValue,
};

impl ConfluenceClient {
  /// Get a page by its content id, expanding e.g. `body.storage,version`
  pub async fn get_page_by_id(&self, page_id: &str, expand: Option<&str>) -> Result<ConfluencePage> {
    let mut opts = RequestOptions::new();
    if let Some(expand) = expand {
      opts = opts.param("expand", expand);
    }

    self
      .rest
      .get_json(&self.resource(&format!("content/{page_id}")), opts)
      .await
      .map_err(|e| not_found_error(e, &format!("Page {page_id}"), "Failed to fetch Confluence page"))
  }

  /// Look a page up by space key and exact title.
  ///
  /// Returns `None` when no page matches.
  pub async fn get_page_by_title(&self, space: &str, title: &str) -> Result<Option<ConfluencePage>> {
    let opts = RequestOptions::new()
      .param("type", "page")
      .param("spaceKey", space)
      .param("title", title)
      .param("expand", "version,space");

    let results: ContentResults = self
      .rest
      .get_json(&self.resource("content"), opts)
      .await
      .map_err(|e| auth_error(e, "Failed to search Confluence pages"))?;

    Ok(results.results.into_iter().next())
  }

  /// Whether a page with `title` exists in `space`
  pub async fn page_exists(&self, space: &str, title: &str) -> Result<bool> {
    Ok(self.get_page_by_title(space, title).await?.is_some())
  }

  /// Create a page with a storage-format body, optionally below `parent_id`
  pub async fn create_page(
    &self,
    space: &str,
    title: &str,
    body: &str,
    parent_id: Option<&str>,
  ) -> Result<ConfluencePage> {
    let request = CreatePageRequest {
      content_type: "page",
      title: title.to_string(),
      space: SpaceRef { key: space.to_string() },
      body: PageBody {
        storage: Some(StorageValue {
          value: body.to_string(),
          representation: STORAGE_REPRESENTATION.to_string(),
        }),
      },
      ancestors: parent_id
        .map(|id| vec![AncestorRef { id: id.to_string() }])
        .unwrap_or_default(),
    };
    let payload = serde_json::to_value(&request).context("Failed to encode page")?;

    self
      .rest
      .send_json(Method::POST, &self.resource("content"), RequestOptions::new().json(payload))
      .await
      .map_err(|e| auth_error(e, &format!("Failed to create page '{title}' in space {space}")))
  }
}
