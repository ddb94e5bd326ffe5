//! Authentication schemes supported by the REST client.
//!
//! Basic auth is attached to each request; every other scheme becomes a
//! session header installed once when the client is built.

use std::fmt;
use std::path::Path;

use atlas_core::creds::get_credentials;
use atlas_core::url::resolve_token;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::error::{AtlassianError, Result};

/// An OAuth 2.0 access token obtained out of band
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth2Token {
  pub client_id: String,
  pub access_token: String,
  /// Usually `Bearer`
  pub token_type: String,
}

impl OAuth2Token {
  /// Bearer token for `client_id`
  pub fn bearer(client_id: &str, access_token: &str) -> Self {
    Self {
      client_id: client_id.to_string(),
      access_token: access_token.to_string(),
      token_type: "Bearer".to_string(),
    }
  }
}

/// Credentials presented to the Atlassian instance
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Auth {
  /// Anonymous access
  #[default]
  None,
  /// Username (or e-mail) plus password or API token
  Basic { username: String, password: String },
  /// Personal access token sent as `Authorization: Bearer`
  Token(String),
  OAuth2(OAuth2Token),
  /// Session cookies, e.g. a `JSESSIONID` lifted from a browser
  Cookies(Vec<(String, String)>),
}

impl Auth {
  pub fn basic(username: &str, password: &str) -> Self {
    Self::Basic {
      username: username.to_string(),
      password: password.to_string(),
    }
  }

  /// Surrounding whitespace is stripped from the token
  pub fn token(token: &str) -> Self {
    Self::Token(token.trim().to_string())
  }

  /// Choose a scheme from whatever the caller supplied.
  ///
  /// Precedence is basic (only when both username and password are present),
  /// then token, then OAuth 2.0, then cookies.
  pub fn select(
    username: Option<&str>,
    password: Option<&str>,
    token: Option<&str>,
    oauth2: Option<OAuth2Token>,
    cookies: Option<Vec<(String, String)>>,
  ) -> Self {
    match (username, password, token, oauth2, cookies) {
      (Some(username), Some(password), ..) if !username.is_empty() && !password.is_empty() => {
        Self::basic(username, password)
      }
      (_, _, Some(token), ..) => Self::token(token),
      (_, _, None, Some(oauth2), _) => Self::OAuth2(oauth2),
      (_, _, None, None, Some(cookies)) => Self::Cookies(cookies),
      _ => Self::None,
    }
  }

  /// Credentials for `host` from the environment or `<home>/.netrc`.
  ///
  /// A non-blank `$ATLASSIAN_TOKEN` wins; otherwise the `.netrc` entry for the
  /// host (or the `atlassian.net` fallback) is used as basic auth.
  pub fn resolve(home: &Path, host: &str) -> Result<Self> {
    if let Some(token) = resolve_token() {
      debug!("Using bearer token from environment");
      return Ok(Self::token(&token));
    }

    let creds = get_credentials(home, host).map_err(|e| AtlassianError::Config(e.to_string()))?;
    Ok(Self::basic(&creds.username, &creds.password))
  }

  /// Short scheme name for logs
  pub fn scheme(&self) -> &'static str {
    match self {
      Self::None => "none",
      Self::Basic { .. } => "basic",
      Self::Token(_) => "token",
      Self::OAuth2(_) => "oauth2",
      Self::Cookies(_) => "cookies",
    }
  }

  /// Headers to install on the session for this scheme
  pub(crate) fn session_headers(&self) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    match self {
      Self::None | Self::Basic { .. } => {}
      Self::Token(token) => {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
      }
      Self::OAuth2(oauth) => {
        if oauth.access_token.is_empty() {
          return Err(AtlassianError::Config("OAuth 2.0 access token is empty".to_string()));
        }
        let mut value = HeaderValue::from_str(&format!("{} {}", oauth.token_type, oauth.access_token))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
      }
      Self::Cookies(cookies) if !cookies.is_empty() => {
        let rendered = cookies
          .iter()
          .map(|(name, value)| format!("{name}={value}"))
          .collect::<Vec<_>>()
          .join("; ");
        let mut value = HeaderValue::from_str(&rendered)?;
        value.set_sensitive(true);
        headers.insert(COOKIE, value);
      }
      Self::Cookies(_) => {}
    }

    Ok(headers)
  }
}

impl fmt::Debug for Auth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Basic { username, .. } => f
        .debug_struct("Basic")
        .field("username", username)
        .field("password", &"<redacted>")
        .finish(),
      Self::OAuth2(oauth) => f
        .debug_struct("OAuth2")
        .field("client_id", &oauth.client_id)
        .field("token_type", &oauth.token_type)
        .finish_non_exhaustive(),
      other => f.write_str(other.scheme()),
    }
  }
}

#[cfg(test)]
mod tests {
  use atlas_core::url::ENV_ATLASSIAN_TOKEN;
  use atlas_test_utils::{EnvVarGuard, NetrcGuard};

  use super::*;

  #[test]
  fn test_select_prefers_basic_when_complete() {
    let auth = Auth::select(Some("user"), Some("pass"), Some("token"), None, None);
    assert_eq!(auth, Auth::basic("user", "pass"));
  }

  #[test]
  fn test_select_falls_through_incomplete_basic() {
    let auth = Auth::select(Some("user"), None, Some(" token\n"), None, None);
    assert_eq!(auth, Auth::Token("token".to_string()));

    let auth = Auth::select(None, None, None, Some(OAuth2Token::bearer("client", "abc")), None);
    assert_eq!(auth.scheme(), "oauth2");

    let cookies = vec![("JSESSIONID".to_string(), "42".to_string())];
    let auth = Auth::select(Some(""), Some(""), None, None, Some(cookies.clone()));
    assert_eq!(auth, Auth::Cookies(cookies));

    assert_eq!(Auth::select(None, None, None, None, None), Auth::None);
  }

  #[test]
  fn test_session_headers() {
    let headers = Auth::token("abc").session_headers().unwrap();
    assert_eq!(headers[AUTHORIZATION], "Bearer abc");

    let headers = Auth::OAuth2(OAuth2Token::bearer("client", "xyz"))
      .session_headers()
      .unwrap();
    assert_eq!(headers[AUTHORIZATION], "Bearer xyz");

    let headers = Auth::Cookies(vec![
      ("a".to_string(), "1".to_string()),
      ("b".to_string(), "2".to_string()),
    ])
    .session_headers()
    .unwrap();
    assert_eq!(headers[COOKIE], "a=1; b=2");

    assert!(Auth::basic("u", "p").session_headers().unwrap().is_empty());
  }

  #[test]
  fn test_empty_oauth2_token_is_rejected() {
    let result = Auth::OAuth2(OAuth2Token::bearer("client", "")).session_headers();
    assert!(matches!(result, Err(AtlassianError::Config(_))));
  }

  #[test]
  fn test_debug_redacts_secrets() {
    let rendered = format!("{:?}", Auth::basic("user", "hunter2"));
    assert!(rendered.contains("user"));
    assert!(!rendered.contains("hunter2"));

    let rendered = format!("{:?}", Auth::token("secret-token"));
    assert_eq!(rendered, "token");
  }

  #[test]
  fn test_resolve_prefers_environment_token() {
    let netrc = NetrcGuard::new("machine jira.example.com\n  login user\n  password pass\n");
    let token = EnvVarGuard::new(ENV_ATLASSIAN_TOKEN);

    token.set("env-token");
    let auth = Auth::resolve(netrc.home_dir(), "https://jira.example.com").unwrap();
    assert_eq!(auth, Auth::Token("env-token".to_string()));

    token.remove();
    let auth = Auth::resolve(netrc.home_dir(), "https://jira.example.com").unwrap();
    assert_eq!(auth, Auth::basic("user", "pass"));
  }

  #[test]
  fn test_resolve_without_credentials() {
    let netrc = NetrcGuard::new("");
    let token = EnvVarGuard::new(ENV_ATLASSIAN_TOKEN);
    token.remove();

    let error = Auth::resolve(netrc.home_dir(), "wiki.example.com").unwrap_err();
    assert!(matches!(error, AtlassianError::Config(_)));
    assert!(error.to_string().contains("wiki.example.com"));
  }
}
