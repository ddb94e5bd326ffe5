//! CQL search.

use anyhow::Result;
use atlas_rest::RequestOptions;
use tracing::debug;

use crate::client::{ConfluenceClient, auth_error};
use crate::consts::DEFAULT_LIMIT;
use crate::models::ContentResults;

impl ConfluenceClient {
  /// Search content with a CQL query, e.g. `space = DOCS and type = page`
  pub async fn cql(&self, query: &str, start: u32, limit: Option<u32>) -> Result<ContentResults> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    debug!("CQL search '{query}' (start {start}, limit {limit})");

    let opts = RequestOptions::new()
      .param("cql", query)
      .param("start", start)
      .param("limit", limit);

    self
      .rest
      .get_json(&self.resource("content/search"), opts)
      .await
      .map_err(|e| auth_error(e, "Failed to run CQL search"))
  }
}
