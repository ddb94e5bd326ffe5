use anyhow::{Context, Result};
use atlas_core::url::is_cloud_url;
use atlas_rest::{AtlassianError, Auth, Method, RequestOptions, RestClient};

use crate::consts::{CLOUD_API_ROOT, SERVER_API_ROOT};

/// Represents a Confluence API client
#[derive(Debug, Clone)]
pub struct ConfluenceClient {
  pub(crate) rest: RestClient,
}

impl ConfluenceClient {
  /// Create a new Confluence client.
  ///
  /// `*.atlassian.net` URLs are treated as Cloud sites.
  pub fn new(base_url: &str, auth: Auth) -> Result<Self> {
    let rest = RestClient::builder(base_url)
      .auth(auth)
      .cloud(is_cloud_url(base_url))
      .build()
      .context("Failed to create Confluence client")?;
    Ok(Self { rest })
  }

  /// Wrap an already configured REST client
  pub fn from_rest(rest: RestClient) -> Self {
    Self { rest }
  }

  pub fn rest(&self) -> &RestClient {
    &self.rest
  }

  pub fn base_url(&self) -> &str {
    self.rest.base_url()
  }

  /// `[wiki/]rest/api/<resource>`; Confluence has no version segment
  pub(crate) fn resource(&self, resource: &str) -> String {
    let root = if self.rest.is_cloud() {
      CLOUD_API_ROOT
    } else {
      SERVER_API_ROOT
    };
    self.rest.resource_url(resource, Some(root), Some(""))
  }

  /// Test the Confluence connection by fetching the current user
  pub async fn test_connection(&self) -> Result<bool> {
    let response = self
      .rest
      .request(
        Method::GET,
        &self.resource("user/current"),
        RequestOptions::new().advanced_mode(true),
      )
      .await
      .context("Failed to connect to Confluence")?;

    Ok(response.status().is_success())
  }
}

/// Create a Confluence client from credentials
pub fn create_confluence_client(base_url: &str, username: &str, api_token: &str) -> Result<ConfluenceClient> {
  ConfluenceClient::new(base_url, Auth::basic(username, api_token))
}

pub(crate) fn auth_error(error: AtlassianError, context: &str) -> anyhow::Error {
  if error.is_auth_failure() {
    anyhow::anyhow!("Authentication failed. Please check your Confluence credentials.")
  } else {
    anyhow::Error::new(error).context(context.to_string())
  }
}

/// 404 becomes "`<what>` not found"
pub(crate) fn not_found_error(error: AtlassianError, what: &str, context: &str) -> anyhow::Error {
  if error.is_not_found() {
    anyhow::anyhow!("{what} not found")
  } else {
    auth_error(error, context)
  }
}
