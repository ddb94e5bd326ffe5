//! Render outgoing requests as copy-pasteable curl commands for debug logs.

use reqwest::Method;
use reqwest::header::HeaderMap;
use tracing::{Level, debug, enabled};

/// Build `curl --silent -X METHOD -H 'k: v' ... --data '<payload>' 'url'`.
///
/// Only the per-request headers are rendered; session credentials never end
/// up in the log line. Header values that are not visible ASCII are shown
/// as `<binary>`.
pub fn curl_command(method: &Method, url: &str, headers: &HeaderMap, data: Option<&str>) -> String {
  let headers = headers
    .iter()
    .map(|(name, value)| format!("'{}: {}'", name, value.to_str().unwrap_or("<binary>")))
    .collect::<Vec<_>>()
    .join(" -H ");

  let data = data.map(|payload| format!("--data '{payload}'")).unwrap_or_default();

  format!("curl --silent -X {method} -H {headers} {data} '{url}'")
}

/// Emit the curl line at DEBUG, skipping the formatting work when DEBUG is off
pub(crate) fn log_curl_debug(method: &Method, url: &str, headers: &HeaderMap, data: Option<&str>) {
  if enabled!(Level::DEBUG) {
    debug!("{}", curl_command(method, url, headers, data));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::headers::HeaderPreset;

  #[test]
  fn test_curl_command_with_data() {
    let command = curl_command(
      &Method::POST,
      "https://jira.example.com/rest/api/2/issue",
      &HeaderPreset::Default.headers(),
      Some(r#"{"fields":{}}"#),
    );
    assert_eq!(
      command,
      "curl --silent -X POST -H 'content-type: application/json' -H 'accept: application/json' \
       --data '{\"fields\":{}}' 'https://jira.example.com/rest/api/2/issue'"
    );
  }

  #[test]
  fn test_curl_command_without_data() {
    let command = curl_command(
      &Method::GET,
      "https://x/rest/api/latest/myself",
      &HeaderPreset::NoCheck.headers(),
      None,
    );
    assert_eq!(
      command,
      "curl --silent -X GET -H 'x-atlassian-token: no-check'  'https://x/rest/api/latest/myself'"
    );
  }
}
