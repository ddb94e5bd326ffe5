use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::home::HomeEnvGuard;

/// RAII guard for test .netrc files
///
/// This struct creates a temporary HOME directory holding a `.netrc` file with
/// the given content. HOME is restored when the guard is dropped.
pub struct NetrcGuard {
  home: HomeEnvGuard,
  netrc_path: PathBuf,
}

impl NetrcGuard {
  /// Create a new NetrcGuard with the given content
  pub fn new(content: &str) -> Self {
    let home = HomeEnvGuard::new();
    let netrc_path = home.home_path(".netrc");

    fs::write(&netrc_path, content).expect("Failed to write test .netrc");

    Self { home, netrc_path }
  }

  /// Get the path to the .netrc file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }

  /// Get the path to the temporary directory
  pub fn home_dir(&self) -> &Path {
    self.home.home_dir()
  }

  /// Read back the current .netrc content
  pub fn read(&self) -> Result<String> {
    fs::read_to_string(&self.netrc_path).context("Failed to read test .netrc")
  }
}
