use anyhow::Result;
use atlas_rest::RequestOptions;

use crate::client::{ConfluenceClient, not_found_error};
use crate::models::ConfluenceSpace;

impl ConfluenceClient {
  /// Get a space by key
  pub async fn get_space(&self, space_key: &str) -> Result<ConfluenceSpace> {
    self
      .rest
      .get_json(&self.resource(&format!("space/{space_key}")), RequestOptions::new())
      .await
      .map_err(|e| not_found_error(e, &format!("Space {space_key}"), "Failed to fetch Confluence space"))
  }
}
