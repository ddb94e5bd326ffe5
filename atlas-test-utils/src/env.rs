//! Environment variable management for testing
//!
//! This module provides utilities for managing environment variables during
//! testing to ensure tests don't interfere with each other.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

use tempfile::TempDir;

/// Returns the process-wide lock guarding a single environment variable.
///
/// Locks are created on first use and live for the rest of the test binary.
pub(crate) fn lock_var(name: &str) -> MutexGuard<'static, ()> {
  static LOCKS: OnceLock<Mutex<HashMap<String, &'static Mutex<()>>>> = OnceLock::new();

  let lock = {
    let mut locks = LOCKS
      .get_or_init(|| Mutex::new(HashMap::new()))
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner());
    *locks
      .entry(name.to_string())
      .or_insert_with(|| Box::leak(Box::new(Mutex::new(()))))
  };

  // A panicking test must not wedge every later test using the same variable
  lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// RAII guard for a single environment variable
///
/// The original value is captured on creation and restored on drop. While
/// the guard is alive no other guard can touch the same variable.
pub struct EnvVarGuard {
  name: String,
  original: Option<String>,
  _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
  /// Take ownership of `name` for the lifetime of the guard
  pub fn new(name: &str) -> Self {
    let lock = lock_var(name);
    let original = env::var(name).ok();

    Self {
      name: name.to_string(),
      original,
      _lock: lock,
    }
  }

  /// Set the variable to `value`
  pub fn set(&self, value: &str) {
    unsafe {
      env::set_var(&self.name, value);
    }
  }

  /// Remove the variable from the environment
  pub fn remove(&self) {
    unsafe {
      env::remove_var(&self.name);
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      Some(val) => unsafe {
        env::set_var(&self.name, val);
      },
      None => unsafe {
        env::remove_var(&self.name);
      },
    }
  }
}

/// A test environment that overrides XDG directories to use a per-test
/// temporary directory
pub struct XdgEnvGuard {
  /// The temporary directory that will be used for XDG directories
  pub temp_dir: TempDir,
  config_home: EnvVarGuard,
  data_home: EnvVarGuard,
  cache_home: EnvVarGuard,
}

impl Default for XdgEnvGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl XdgEnvGuard {
  /// XDG environment variable names
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";
  pub const XDG_DATA_HOME: &'static str = "XDG_DATA_HOME";
  pub const XDG_CACHE_HOME: &'static str = "XDG_CACHE_HOME";

  /// Create a new test environment with overridden XDG directories
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    let config_home = EnvVarGuard::new(Self::XDG_CONFIG_HOME);
    let data_home = EnvVarGuard::new(Self::XDG_DATA_HOME);
    let cache_home = EnvVarGuard::new(Self::XDG_CACHE_HOME);

    let temp_path = temp_dir.path().to_path_buf();
    for (guard, dir) in [(&config_home, "config"), (&data_home, "data"), (&cache_home, "cache")] {
      let path = temp_path.join(dir);
      std::fs::create_dir_all(&path).expect("Failed to create XDG directory");
      guard.set(&path.to_string_lossy());
    }

    Self {
      temp_dir,
      config_home,
      data_home,
      cache_home,
    }
  }

  /// Get the path to the XDG config directory
  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }

  /// Get the path to the XDG data directory
  pub fn data_dir(&self) -> PathBuf {
    self.temp_dir.path().join("data")
  }

  /// Get the path to the XDG cache directory
  pub fn cache_dir(&self) -> PathBuf {
    self.temp_dir.path().join("cache")
  }
}
