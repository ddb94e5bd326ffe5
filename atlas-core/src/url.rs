//! URL helpers shared across crates.
//!
//! Names the environment variables atlas reads and normalizes user-supplied
//! hosts so both the CLI and the service clients agree on the base URL they
//! talk to.

use anyhow::Result;
use url::{Position, Url};

/// Environment variable holding the Atlassian instance URL.
pub const ENV_ATLASSIAN_URL: &str = "ATLASSIAN_URL";

/// Environment variable holding a personal access / API bearer token.
pub const ENV_ATLASSIAN_TOKEN: &str = "ATLASSIAN_TOKEN";

/// Base URL of the Atlassian Cloud platform gateway.
pub const ATLASSIAN_CLOUD_GATEWAY: &str = "https://api.atlassian.com";

/// Read `$ATLASSIAN_TOKEN`, ignoring blank values.
pub fn resolve_token() -> Option<String> {
  std::env::var(ENV_ATLASSIAN_TOKEN)
    .ok()
    .map(|token| token.trim().to_string())
    .filter(|token| !token.is_empty())
}

/// Cloud sites live under `*.atlassian.net` (or the platform gateway).
pub fn is_cloud_url(input: &str) -> bool {
  Url::parse(input.trim())
    .ok()
    .and_then(|url| url.host_str().map(|host| host.to_ascii_lowercase()))
    .is_some_and(|host| host.ends_with(".atlassian.net") || host == "api.atlassian.com")
}

/// Render a URL without the lone `/` path `Url` adds to bare hosts.
fn render(url: &Url) -> String {
  let mut rendered = url[..Position::BeforePath].to_string();
  if url.path() != "/" {
    rendered.push_str(url.path());
  }
  rendered.push_str(&url[Position::AfterPath..]);
  rendered
}

/// Ensure a host has a URL scheme, defaulting to https.
///
/// Schemes are lowercased, a single-slash typo like `https:/host` is repaired
/// (as https), and a trailing `/` on a bare host is dropped.
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow::anyhow!("Host cannot be empty"));
  }

  let lowered = trimmed.to_ascii_lowercase();
  let candidate = if (lowered.starts_with("http:") && !lowered.starts_with("http://"))
    || (lowered.starts_with("https:") && !lowered.starts_with("https://"))
  {
    let remainder = trimmed.split_once(':').map(|(_, rest)| rest).unwrap_or_default();
    format!("https://{}", remainder.trim_start_matches('/'))
  } else {
    match Url::parse(trimmed) {
      Ok(url) if url.host().is_some() => return Ok(render(&url)),
      _ => format!("https://{trimmed}"),
    }
  };

  Url::parse(&candidate)
    .map(|url| render(&url))
    .map_err(|e| anyhow::anyhow!("Failed to parse URL '{input}': {e}"))
}
