//! Retry decisions for rate-limited and overloaded instances.
//!
//! Atlassian Cloud enforces per-user rate limits and answers with 429 plus a
//! `Retry-After` header; Data Center nodes shed load with 503. A
//! [`RetryHandler`] lives for the duration of one logical request and decides,
//! response by response, whether and how long to wait before resending it.

use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use tracing::debug;

use crate::settings::RetryPolicy;

/// Backoff delay before retry number `retry_count` (1-based).
///
/// `backoff_factor * 2^(retry_count - 1)`, plus a uniform random amount up to
/// `backoff_jitter`, clamped to `[0, max_backoff_seconds]`.
pub fn calculate_backoff(policy: &RetryPolicy, retry_count: u32) -> Duration {
  let exponent = i32::try_from(retry_count.saturating_sub(1)).unwrap_or(i32::MAX);
  let mut seconds = if policy.backoff_factor == 0.0 {
    0.0
  } else {
    policy.backoff_factor * 2f64.powi(exponent)
  };

  if policy.backoff_jitter != 0.0 && policy.backoff_jitter.is_finite() {
    let (low, high) = if policy.backoff_jitter > 0.0 {
      (0.0, policy.backoff_jitter)
    } else {
      (policy.backoff_jitter, 0.0)
    };
    seconds += rand::thread_rng().gen_range(low..=high);
  }

  let clamped = seconds.min(policy.max_backoff_seconds).max(0.0);
  Duration::try_from_secs_f64(clamped).unwrap_or(Duration::MAX)
}

/// Whole seconds from a `Retry-After` header. HTTP-date values are ignored.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
  headers
    .get(RETRY_AFTER)?
    .to_str()
    .ok()?
    .trim()
    .parse::<u64>()
    .ok()
}

/// Tracks the retries spent on a single request
#[derive(Debug)]
pub struct RetryHandler<'a> {
  policy: &'a RetryPolicy,
  retries: u32,
}

impl<'a> RetryHandler<'a> {
  pub fn new(policy: &'a RetryPolicy) -> Self {
    Self { policy, retries: 0 }
  }

  /// Retries consumed so far
  pub fn retries(&self) -> u32 {
    self.retries
  }

  /// How long to wait before resending, or `None` to accept the response.
  ///
  /// A 429 with a numeric `Retry-After` is honoured whenever
  /// `retry_with_header` is set, clamped to `max_backoff_seconds`, with no
  /// limit on the number of attempts. Otherwise, with
  /// backoff enabled, statuses in `status_codes` are retried with
  /// [`calculate_backoff`] until `max_retries` is spent.
  pub fn next_delay(&mut self, status: StatusCode, headers: &HeaderMap) -> Option<Duration> {
    if self.policy.retry_with_header && status == StatusCode::TOO_MANY_REQUESTS {
      if let Some(seconds) = parse_retry_after(headers) {
        self.retries += 1;
        let max = Duration::try_from_secs_f64(self.policy.max_backoff_seconds.max(0.0)).unwrap_or(Duration::MAX);
        let delay = Duration::from_secs(seconds).min(max);
        debug!("Retry-After {seconds}s on attempt {}", self.retries);
        return Some(delay);
      }
    }

    if self.policy.enabled
      && self.retries < self.policy.max_retries
      && self.policy.status_codes.contains(&status.as_u16())
    {
      self.retries += 1;
      return Some(calculate_backoff(self.policy, self.retries));
    }

    None
  }
}

#[cfg(test)]
mod tests {
  use reqwest::header::HeaderValue;

  use super::*;

  fn base_policy(enabled: bool) -> RetryPolicy {
    RetryPolicy {
      enabled,
      backoff_jitter: 0.0,
      ..RetryPolicy::default()
    }
  }

  fn retry_after(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
    headers
  }

  #[test]
  fn test_backoff_is_exponential_without_jitter() {
    let policy = RetryPolicy {
      backoff_factor: 0.5,
      ..base_policy(true)
    };
    assert_eq!(calculate_backoff(&policy, 1), Duration::from_millis(500));
    assert_eq!(calculate_backoff(&policy, 2), Duration::from_secs(1));
    assert_eq!(calculate_backoff(&policy, 4), Duration::from_secs(4));
  }

  #[test]
  fn test_backoff_is_clamped() {
    let policy = RetryPolicy {
      max_backoff_seconds: 10.0,
      ..base_policy(true)
    };
    assert_eq!(calculate_backoff(&policy, 8), Duration::from_secs(10));
    assert_eq!(calculate_backoff(&policy, 1000), Duration::from_secs(10));

    let negative = RetryPolicy {
      backoff_factor: -3.0,
      ..base_policy(true)
    };
    assert_eq!(calculate_backoff(&negative, 1), Duration::ZERO);
  }

  #[test]
  fn test_backoff_jitter_stays_in_range() {
    let policy = RetryPolicy {
      backoff_factor: 1.0,
      backoff_jitter: 0.25,
      ..base_policy(true)
    };
    for _ in 0..50 {
      let delay = calculate_backoff(&policy, 1);
      assert!(delay >= Duration::from_secs(1));
      assert!(delay <= Duration::from_millis(1250));
    }
  }

  #[test]
  fn test_retry_after_header_on_429() {
    let policy = base_policy(false);
    let mut handler = RetryHandler::new(&policy);

    let delay = handler.next_delay(StatusCode::TOO_MANY_REQUESTS, &retry_after("3"));
    assert_eq!(delay, Some(Duration::from_secs(3)));
    assert_eq!(handler.retries(), 1);

    // Not a 429: header alone is not enough
    assert_eq!(handler.next_delay(StatusCode::SERVICE_UNAVAILABLE, &retry_after("3")), None);
    // Dates are not understood
    assert_eq!(
      handler.next_delay(
        StatusCode::TOO_MANY_REQUESTS,
        &retry_after("Wed, 21 Oct 2015 07:28:00 GMT")
      ),
      None
    );
  }

  #[test]
  fn test_retry_after_ignores_retry_budget() {
    let policy = RetryPolicy {
      max_retries: 0,
      ..base_policy(true)
    };
    let mut handler = RetryHandler::new(&policy);

    assert_eq!(
      handler.next_delay(StatusCode::TOO_MANY_REQUESTS, &retry_after("2")),
      Some(Duration::from_secs(2))
    );
    assert_eq!(
      handler.next_delay(StatusCode::TOO_MANY_REQUESTS, &retry_after("2")),
      Some(Duration::from_secs(2))
    );
    // Status-code backoff still respects the budget
    assert_eq!(handler.next_delay(StatusCode::SERVICE_UNAVAILABLE, &HeaderMap::new()), None);
  }

  #[test]
  fn test_retry_after_is_clamped_to_max_backoff() {
    let policy = RetryPolicy {
      max_backoff_seconds: 5.0,
      ..base_policy(false)
    };
    let mut handler = RetryHandler::new(&policy);
    assert_eq!(
      handler.next_delay(StatusCode::TOO_MANY_REQUESTS, &retry_after("3600")),
      Some(Duration::from_secs(5))
    );
  }

  #[test]
  fn test_retry_after_disabled() {
    let policy = RetryPolicy {
      retry_with_header: false,
      ..base_policy(false)
    };
    let mut handler = RetryHandler::new(&policy);
    assert_eq!(handler.next_delay(StatusCode::TOO_MANY_REQUESTS, &retry_after("1")), None);
  }

  #[test]
  fn test_status_backoff_until_budget_exhausted() {
    let policy = RetryPolicy {
      max_retries: 2,
      backoff_factor: 0.0,
      ..base_policy(true)
    };
    let mut handler = RetryHandler::new(&policy);
    let headers = HeaderMap::new();

    assert_eq!(handler.next_delay(StatusCode::SERVICE_UNAVAILABLE, &headers), Some(Duration::ZERO));
    assert_eq!(handler.next_delay(StatusCode::PAYLOAD_TOO_LARGE, &headers), Some(Duration::ZERO));
    assert_eq!(handler.next_delay(StatusCode::SERVICE_UNAVAILABLE, &headers), None);
  }

  #[test]
  fn test_unlisted_status_is_not_retried() {
    let policy = base_policy(true);
    let mut handler = RetryHandler::new(&policy);
    assert_eq!(handler.next_delay(StatusCode::INTERNAL_SERVER_ERROR, &HeaderMap::new()), None);
    assert_eq!(handler.next_delay(StatusCode::OK, &HeaderMap::new()), None);
  }

  #[test]
  fn test_backoff_disabled_ignores_status_codes() {
    let policy = base_policy(false);
    let mut handler = RetryHandler::new(&policy);
    assert_eq!(handler.next_delay(StatusCode::SERVICE_UNAVAILABLE, &HeaderMap::new()), None);
  }
}
