//! # CLI Configuration
//!
//! The `config.toml` file: which instance to talk to and how the REST client
//! behaves when talking to it.

use anyhow::Result;
use atlas_core::url::ensure_url_scheme;
use atlas_core::{ConfigDirs, get_config_dirs};
use atlas_rest::ClientSettings;
use serde::{Deserialize, Serialize};

/// Contents of `<config_dir>/atlas/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
  /// Base URL of the Atlassian instance
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  /// REST client settings (timeouts, TLS, retries)
  pub client: ClientSettings,
}

impl AtlasConfig {
  pub fn load() -> Result<Self> {
    Self::load_from(&get_config_dirs()?)
  }

  pub fn load_from(dirs: &ConfigDirs) -> Result<Self> {
    dirs.load_config()
  }

  pub fn save(&self) -> Result<()> {
    get_config_dirs()?.save_config(self)
  }

  /// Store `url`, normalized to carry a scheme
  pub fn set_url(&mut self, url: &str) -> Result<String> {
    let url = ensure_url_scheme(url)?;
    self.url = Some(url.clone());
    Ok(url)
  }
}

#[cfg(test)]
mod tests {
  use atlas_test_utils::XdgEnvGuard;

  use super::*;

  #[test]
  fn test_missing_config_uses_defaults() {
    let _xdg = XdgEnvGuard::new();
    let config = AtlasConfig::load().unwrap();
    assert_eq!(config, AtlasConfig::default());
    assert_eq!(config.client.timeout_secs, 75.0);
  }

  #[test]
  fn test_set_url_and_round_trip() {
    let _xdg = XdgEnvGuard::new();

    let mut config = AtlasConfig::default();
    assert_eq!(config.set_url("company.atlassian.net/").unwrap(), "https://company.atlassian.net");
    config.client.retry.enabled = true;
    config.save().unwrap();

    let loaded = AtlasConfig::load().unwrap();
    assert_eq!(loaded.url.as_deref(), Some("https://company.atlassian.net"));
    assert!(loaded.client.retry.enabled);
  }

  #[test]
  fn test_partial_file_keeps_client_defaults() {
    let _xdg = XdgEnvGuard::new();
    let dirs = get_config_dirs().unwrap();
    std::fs::create_dir_all(dirs.config_dir()).unwrap();
    std::fs::write(
      dirs.config_path(),
      "url = \"https://jira.example.com\"\n\n[client]\ntimeout_secs = 10\n\n[client.retry]\nmax_retries = 3\n",
    )
    .unwrap();

    let config = AtlasConfig::load_from(&dirs).unwrap();
    assert_eq!(config.url.as_deref(), Some("https://jira.example.com"));
    assert_eq!(config.client.timeout_secs, 10.0);
    assert_eq!(config.client.retry.max_retries, 3);
    assert_eq!(config.client.api_root, "rest/api");
  }
}
