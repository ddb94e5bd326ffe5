//! # Client Creation
//!
//! Centralized client creation for the Atlassian products. The instance URL
//! comes from `--url` (or `$ATLASSIAN_URL`), falling back to the config file;
//! credentials come from `$ATLASSIAN_TOKEN` or `.netrc`.

use anyhow::{Context, Result};
use atlas_confluence::ConfluenceClient;
use atlas_core::url::{ENV_ATLASSIAN_URL, ensure_url_scheme, is_cloud_url};
use atlas_jira::JiraClient;
use atlas_rest::{Auth, RestClient};
use directories::BaseDirs;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::config::AtlasConfig;

/// Pick the instance URL: explicit value first, then the config file
pub fn resolve_url(url: Option<&str>, config: &AtlasConfig) -> Result<String> {
  match url.or(config.url.as_deref()) {
    Some(url) => ensure_url_scheme(url),
    None => Err(anyhow::anyhow!(
      "No Atlassian URL configured. Pass --url, set ${ENV_ATLASSIAN_URL}, or run 'atlas config set-url <URL>'."
    )),
  }
}

/// Creates an authenticated REST client for the configured instance
pub fn create_rest_client(url: Option<&str>) -> Result<RestClient> {
  let config = AtlasConfig::load()?;
  let base_url = resolve_url(url, &config)?;

  let base_dirs = BaseDirs::new().context("Failed to get $HOME directory")?;
  let auth = Auth::resolve(base_dirs.home_dir(), &base_url).context("Failed to get credentials")?;
  debug!("Connecting to {base_url} with {} auth", auth.scheme());

  let cloud = config.client.cloud || is_cloud_url(&base_url);
  RestClient::builder(&base_url)
    .settings(config.client)
    .cloud(cloud)
    .auth(auth)
    .build()
    .context("Failed to create REST client")
}

/// Creates a tokio runtime and an authenticated REST client
pub fn create_rest_runtime_and_client(url: Option<&str>) -> Result<(Runtime, RestClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_rest_client(url)?;
  Ok((rt, client))
}

/// Creates a tokio runtime and an authenticated Jira client
pub fn create_jira_runtime_and_client(url: Option<&str>) -> Result<(Runtime, JiraClient)> {
  let (rt, rest) = create_rest_runtime_and_client(url)?;
  Ok((rt, JiraClient::from_rest(rest)))
}

/// Creates a tokio runtime and an authenticated Confluence client
pub fn create_confluence_runtime_and_client(url: Option<&str>) -> Result<(Runtime, ConfluenceClient)> {
  let (rt, rest) = create_rest_runtime_and_client(url)?;
  Ok((rt, ConfluenceClient::from_rest(rest)))
}
