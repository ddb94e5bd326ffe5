//! Helpers for reading and writing credentials stored in `.netrc` files.
//!
//! Both the single-line (`machine host login user password pass`) and the
//! multi-line layouts are understood, as is any mix of the two. `account`
//! values are skipped; `macdef` blocks are not supported.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::creds::Credentials;

/// Returns the path to the `.netrc` file for the provided home directory.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use atlas_core::creds::netrc::get_netrc_path;
///
/// let path = get_netrc_path(Path::new("/home/user"));
/// assert_eq!(path, Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// A single `machine` block as it appears in the file
#[derive(Debug, Default)]
struct Entry<'a> {
  machine: &'a str,
  login: Option<&'a str>,
  password: Option<&'a str>,
}

impl Entry<'_> {
  fn credentials(&self) -> Option<Credentials> {
    match (self.login, self.password) {
      (Some(username), Some(password)) => Some(Credentials {
        username: username.to_string(),
        password: password.to_string(),
      }),
      _ => None,
    }
  }
}

fn parse_entries(content: &str) -> Vec<Entry<'_>> {
  let mut entries: Vec<Entry<'_>> = Vec::new();
  let mut tokens = content.split_whitespace();

  while let Some(token) = tokens.next() {
    match token {
      "machine" => {
        if let Some(machine) = tokens.next() {
          entries.push(Entry {
            machine,
            ..Entry::default()
          });
        }
      }
      "login" | "password" | "account" => {
        let value = tokens.next();
        if let Some(entry) = entries.last_mut() {
          match token {
            "login" => entry.login = value,
            "password" => entry.password = value,
            _ => {}
          }
        }
      }
      _ => {}
    }
  }

  entries
}

/// Parses a `.netrc` file and returns credentials for the requested machine.
///
/// If the target machine is not present or has a missing `login`/`password`
/// value, `Ok(None)` is returned.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn parse_netrc_file(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  let content = fs::read_to_string(path).context("Failed to open .netrc file")?;

  Ok(
    parse_entries(&content)
      .iter()
      .find(|entry| entry.machine == target_machine)
      .and_then(Entry::credentials),
  )
}

fn render_entry(machine: &str, username: &str, password: &str) -> String {
  format!("machine {machine}\n  login {username}\n  password {password}\n")
}

/// Writes or updates a `.netrc` entry for the given machine.
///
/// An existing block for the machine is replaced in place (everything up to
/// the next `machine` line); otherwise a new block is appended. On Unix the
/// file mode is tightened to `600`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, written, or have its
/// permissions changed.
pub fn write_netrc_entry(path: &Path, machine: &str, username: &str, password: &str) -> Result<()> {
  let existing = if path.exists() {
    fs::read_to_string(path).context("Failed to read existing .netrc file")?
  } else {
    String::new()
  };

  let header = format!("machine {machine}");
  let has_machine = existing.lines().any(|line| line.trim() == header);

  if has_machine {
    let mut updated = String::with_capacity(existing.len());
    let mut skipping = false;

    for line in existing.lines() {
      let trimmed = line.trim();
      if trimmed.starts_with("machine ") {
        skipping = trimmed == header;
        if skipping {
          updated.push_str(&render_entry(machine, username, password));
          continue;
        }
      }
      if !skipping {
        updated.push_str(line);
        updated.push('\n');
      }
    }

    fs::write(path, updated).context("Failed to write updated .netrc file")?;
  } else {
    let mut file = fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(path)
      .context("Failed to open .netrc file for writing")?;

    if !existing.is_empty() && !existing.ends_with('\n') {
      writeln!(file)?;
    }
    file
      .write_all(render_entry(machine, username, password).as_bytes())
      .context("Failed to append .netrc entry")?;
  }

  set_secure_permissions(path)
}

#[cfg(unix)]
fn set_secure_permissions(path: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  fs::set_permissions(path, fs::Permissions::from_mode(0o600)).context("Failed to set .netrc permissions to 600")
}

#[cfg(not(unix))]
fn set_secure_permissions(_path: &Path) -> Result<()> {
  Ok(())
}

/// Returns true if the file is readable by group or others.
#[cfg(unix)]
pub fn has_insecure_permissions(path: &Path) -> Result<bool> {
  use std::os::unix::fs::PermissionsExt;

  let mode = fs::metadata(path).context("Failed to read .netrc metadata")?.permissions().mode();
  Ok(mode & 0o077 != 0)
}

/// Returns true if the file is readable by group or others.
#[cfg(not(unix))]
pub fn has_insecure_permissions(_path: &Path) -> Result<bool> {
  Ok(false)
}

/// Normalizes an instance URL into the bare host used as a `.netrc` machine.
///
/// # Examples
///
/// ```
/// use atlas_core::creds::netrc::normalize_host;
///
/// assert_eq!(normalize_host("https://company.atlassian.net/"), "company.atlassian.net");
/// assert_eq!(normalize_host("http://jira.example.com/jira"), "jira.example.com");
/// assert_eq!(normalize_host("my-jira-instance.com"), "my-jira-instance.com");
/// ```
pub fn normalize_host(raw_host: &str) -> String {
  let without_scheme = raw_host
    .trim()
    .trim_start_matches("https://")
    .trim_start_matches("http://");

  without_scheme
    .split('/')
    .next()
    .unwrap_or(without_scheme)
    .to_string()
}
