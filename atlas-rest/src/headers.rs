//! Named request header sets.
//!
//! Several Atlassian endpoints are XSRF protected and only accept scripted
//! requests that carry `X-Atlassian-Token: no-check`; others are gated behind
//! the experimental API opt-in. The presets bundle those combinations.

use std::fmt;
use std::str::FromStr;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

const JSON: &str = "application/json";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded; charset=UTF-8";
const SAFE_MODE_FLAG: &str = "application/vnd.atl.plugins.safe.mode.flag+json";
const NO_CHECK: &str = "no-check";
const OPT_IN: &str = "opt-in";

/// `X-Atlassian-Token` header name
pub const X_ATLASSIAN_TOKEN: HeaderName = HeaderName::from_static("x-atlassian-token");

/// `X-ExperimentalApi` header name
pub const X_EXPERIMENTAL_API: HeaderName = HeaderName::from_static("x-experimentalapi");

/// A predefined set of request headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPreset {
  /// JSON in, JSON out
  #[default]
  Default,
  /// JSON plus the experimental API opt-in
  Experimental,
  /// Form posts to XSRF protected endpoints
  FormToken,
  /// Only the XSRF bypass, e.g. for multipart uploads
  NoCheck,
  /// Toggling UPM safe mode
  SafeMode,
  /// XSRF bypass plus the experimental API opt-in
  ExperimentalGeneral,
}

impl HeaderPreset {
  pub const ALL: [HeaderPreset; 6] = [
    Self::Default,
    Self::Experimental,
    Self::FormToken,
    Self::NoCheck,
    Self::SafeMode,
    Self::ExperimentalGeneral,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Self::Default => "default",
      Self::Experimental => "experimental",
      Self::FormToken => "form-token",
      Self::NoCheck => "no-check",
      Self::SafeMode => "safe-mode",
      Self::ExperimentalGeneral => "experimental-general",
    }
  }

  /// Build the header map for this preset
  pub fn headers(self) -> HeaderMap {
    let mut headers = HeaderMap::new();
    match self {
      Self::Default => {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
      }
      Self::Experimental => {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(X_EXPERIMENTAL_API, HeaderValue::from_static(OPT_IN));
      }
      Self::FormToken => {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        headers.insert(X_ATLASSIAN_TOKEN, HeaderValue::from_static(NO_CHECK));
      }
      Self::NoCheck => {
        headers.insert(X_ATLASSIAN_TOKEN, HeaderValue::from_static(NO_CHECK));
      }
      Self::SafeMode => {
        headers.insert(X_ATLASSIAN_TOKEN, HeaderValue::from_static(NO_CHECK));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(SAFE_MODE_FLAG));
      }
      Self::ExperimentalGeneral => {
        headers.insert(X_ATLASSIAN_TOKEN, HeaderValue::from_static(NO_CHECK));
        headers.insert(X_EXPERIMENTAL_API, HeaderValue::from_static(OPT_IN));
      }
    }
    headers
  }
}

impl fmt::Display for HeaderPreset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for HeaderPreset {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
    Self::ALL
      .into_iter()
      .find(|preset| preset.name() == wanted)
      .ok_or_else(|| {
        let names = Self::ALL.map(HeaderPreset::name).join(", ");
        format!("unknown header preset '{s}' (expected one of: {names})")
      })
  }
}

/// Parse a `Name: value` header line
pub fn parse_header_line(line: &str) -> Result<(HeaderName, HeaderValue), String> {
  let (name, value) = line
    .split_once(':')
    .ok_or_else(|| format!("header '{line}' must look like 'Name: value'"))?;

  let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| format!("invalid header name: {e}"))?;
  let value = HeaderValue::from_str(value.trim()).map_err(|e| format!("invalid header value: {e}"))?;
  Ok((name, value))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_preset() {
    let headers = HeaderPreset::Default.headers();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[CONTENT_TYPE], "application/json");
    assert_eq!(headers[ACCEPT], "application/json");
  }

  #[test]
  fn test_xsrf_presets_carry_no_check() {
    for preset in [
      HeaderPreset::FormToken,
      HeaderPreset::NoCheck,
      HeaderPreset::SafeMode,
      HeaderPreset::ExperimentalGeneral,
    ] {
      assert_eq!(preset.headers()["X-Atlassian-Token"], "no-check", "{preset}");
    }
    assert!(!HeaderPreset::NoCheck.headers().contains_key(CONTENT_TYPE));
  }

  #[test]
  fn test_preset_from_str() {
    assert_eq!("safe_mode".parse::<HeaderPreset>().unwrap(), HeaderPreset::SafeMode);
    assert_eq!(
      "Experimental-General".parse::<HeaderPreset>().unwrap(),
      HeaderPreset::ExperimentalGeneral
    );
    let error = "bogus".parse::<HeaderPreset>().unwrap_err();
    assert!(error.contains("form-token"));
  }

  #[test]
  fn test_parse_header_line() {
    let (name, value) = parse_header_line("X-Atlassian-Token: no-check").unwrap();
    assert_eq!(name, X_ATLASSIAN_TOKEN);
    assert_eq!(value, "no-check");

    assert!(parse_header_line("missing-colon").is_err());
  }
}
