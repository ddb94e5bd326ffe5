//! # Credential Management
//!
//! Lookup of Atlassian credentials stored in the user's `.netrc` file.
//!
//! Hosts are matched on their bare hostname first. Atlassian Cloud users
//! commonly keep a single `atlassian.net` entry for every site, so that
//! machine is consulted as a fallback.

pub mod netrc;

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use self::netrc::{get_netrc_path, normalize_host, parse_netrc_file};

/// Machine name used as a catch-all for Atlassian Cloud sites
pub const FALLBACK_MACHINE: &str = "atlassian.net";

/// Represents credentials for a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

/// Find credentials for `host` in `<home>/.netrc`.
///
/// Returns `Ok(None)` when neither the host nor the fallback machine has a
/// complete entry, or when there is no `.netrc` file at all.
pub fn find_credentials(home: &Path, host: &str) -> Result<Option<Credentials>> {
  let netrc_path = get_netrc_path(home);
  if !netrc_path.exists() {
    debug!("No .netrc file at {}", netrc_path.display());
    return Ok(None);
  }

  let machine = normalize_host(host);
  if let Some(creds) = parse_netrc_file(&netrc_path, &machine)? {
    return Ok(Some(creds));
  }

  debug!("No .netrc entry for '{machine}', trying '{FALLBACK_MACHINE}'");
  parse_netrc_file(&netrc_path, FALLBACK_MACHINE)
}

/// Like [`find_credentials`], but a missing entry is an error that tells the
/// user which machines were searched.
pub fn get_credentials(home: &Path, host: &str) -> Result<Credentials> {
  find_credentials(home, host)?.ok_or_else(|| {
    anyhow::anyhow!(
      "Atlassian credentials not found in .netrc file. Please add credentials for machine '{}' or '{FALLBACK_MACHINE}'.",
      normalize_host(host)
    )
  })
}

#[cfg(test)]
mod tests {
  use atlas_test_utils::NetrcGuard;

  use super::*;

  const NETRC: &str = r#"machine custom-jira-host.com
  login custom@example.com
  password custom-token

machine atlassian.com
  login test@example.com
  password test-token

machine atlassian.net
  login net@example.com
  password net-token
"#;

  #[test]
  fn test_get_credentials_exact_host() {
    let guard = NetrcGuard::new(NETRC);

    let creds = get_credentials(guard.home_dir(), "https://custom-jira-host.com/").unwrap();
    assert_eq!(creds.username, "custom@example.com");
    assert_eq!(creds.password, "custom-token");
  }

  #[test]
  fn test_get_credentials_falls_back_to_atlassian_net() {
    let guard = NetrcGuard::new(NETRC);

    let creds = get_credentials(guard.home_dir(), "nonexistent-host.com").unwrap();
    assert_eq!(creds.username, "net@example.com");
    assert_eq!(creds.password, "net-token");
  }

  #[test]
  fn test_get_credentials_error_message() {
    let guard = NetrcGuard::new("");

    let error = get_credentials(guard.home_dir(), "custom-jira-host.com")
      .unwrap_err()
      .to_string();
    assert!(error.contains("custom-jira-host.com"));
    assert!(error.contains("atlassian.net"));
    assert!(!error.contains("atlassian.com'"));
  }

  #[test]
  fn test_find_credentials_without_netrc_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    assert!(find_credentials(temp_dir.path(), "example.com").unwrap().is_none());
  }
}
