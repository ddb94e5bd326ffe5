//! HOME directory management for testing
//!
//! This module provides utilities for isolating HOME directory during testing
//! to prevent tests from interfering with the user's actual home directory.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::env::EnvVarGuard;

/// A test environment that overrides the HOME directory to use a temporary
/// directory. This is useful for testing credential management and other
/// home directory dependent functionality
pub struct HomeEnvGuard {
  /// The temporary directory that will be used as HOME
  pub temp_dir: TempDir,
  home: EnvVarGuard,
}

impl Default for HomeEnvGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl HomeEnvGuard {
  /// Create a new test environment with a temporary HOME directory
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    let home = EnvVarGuard::new("HOME");
    home.set(&temp_dir.path().to_string_lossy());

    Self { temp_dir, home }
  }

  /// Get the path to the temporary HOME directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Get the path to a file in the temporary HOME directory
  pub fn home_path(&self, relative_path: &str) -> PathBuf {
    self.temp_dir.path().join(relative_path)
  }
}
