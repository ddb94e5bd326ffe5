//! # Configuration Management
//!
//! Locates the atlas configuration, data and cache directories (XDG base
//! directories on Linux) and reads/writes TOML configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Name of the main configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Represents the configuration directories for the atlas application
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: Option<PathBuf>,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("", "", "atlas").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
      data_dir: proj_dirs.data_dir().to_path_buf(),
      cache_dir: Some(proj_dirs.cache_dir().to_path_buf()),
    })
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the data directory
  pub fn data_dir(&self) -> &PathBuf {
    &self.data_dir
  }

  /// Get the cache directory
  pub fn cache_dir(&self) -> Option<&PathBuf> {
    self.cache_dir.as_ref()
  }

  /// Initialize the configuration directories
  pub fn init(&self) -> Result<()> {
    fs::create_dir_all(&self.config_dir).context("Failed to create config directory")?;
    fs::create_dir_all(&self.data_dir).context("Failed to create data directory")?;
    if let Some(cache_dir) = &self.cache_dir {
      fs::create_dir_all(cache_dir).context("Failed to create cache directory")?;
    }
    Ok(())
  }

  /// Get the path to the main configuration file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE_NAME)
  }

  /// Load the main configuration file, falling back to defaults when absent
  pub fn load_config<T: DeserializeOwned + Default>(&self) -> Result<T> {
    load_toml(&self.config_path())
  }

  /// Save the main configuration file
  pub fn save_config<T: Serialize>(&self, config: &T) -> Result<()> {
    save_toml(&self.config_path(), config)
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// Read a TOML file into `T`, returning `T::default()` if the file is missing
pub fn load_toml<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
  if !path.exists() {
    debug!("No config file at {}, using defaults", path.display());
    return Ok(T::default());
  }

  let content = fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;

  toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
}

/// Serialize `value` as pretty TOML to `path`, creating parent directories
pub fn save_toml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
  }

  let content = toml::to_string_pretty(value).context("Failed to serialize config to TOML")?;

  fs::write(path, content).with_context(|| format!("Failed to write config to {}", path.display()))?;

  debug!("Wrote config to {}", path.display());
  Ok(())
}
