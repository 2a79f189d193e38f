//! Fixed-delay retry for enrichment lookups.

use std::{future::Future, time::Duration};

use crate::{Error, Lookup, Result};

/// How many times a lookup is attempted and how long to wait in between.
///
/// Only [transient](Error::is_transient) failures are retried. A parse
/// failure ends the lookup immediately, whatever attempts remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total attempts including the first. Zero is treated as one.
  pub max_attempts: u32,
  pub delay:        Duration,
}

impl RetryPolicy {
  pub const fn fixed(max_attempts: u32, delay: Duration) -> Self { Self { max_attempts, delay } }

  /// A single attempt.
  pub const fn none() -> Self { Self::fixed(1, Duration::ZERO) }

  fn attempts(&self) -> u32 { self.max_attempts.max(1) }

  /// Drive `op` until it succeeds, fails terminally, or runs out of
  /// attempts. `op` receives the 1-based attempt number.
  ///
  /// With more than one attempt allowed, running out yields
  /// [`Error::Exhausted`] wrapping the last failure. A single-attempt policy
  /// returns the failure itself.
  pub async fn run<T, F, Fut>(&self, lookup: Lookup, mut op: F) -> Result<T>
  where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
  {
    let attempts = self.attempts();
    let mut attempt = 1;

    loop {
      let err = match op(attempt).await {
        Ok(value) => return Ok(value),
        Err(err) => err,
      };

      if !err.is_transient() || attempts == 1 {
        return Err(err);
      }
      if attempt >= attempts {
        return Err(Error::Exhausted { lookup, attempts, last: Box::new(err) });
      }

      tracing::warn!(%lookup, attempt, max_attempts = attempts, error = %err, "lookup failed, retrying");
      tokio::time::sleep(self.delay).await;
      attempt += 1;
    }
  }
}

impl Default for RetryPolicy {
  fn default() -> Self { Self::none() }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicU32, Ordering};

  use super::*;

  fn status_error() -> Error { Error::Status { lookup: Lookup::Age, status: 503 } }

  #[tokio::test]
  async fn succeeds_on_last_attempt() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy::fixed(3, Duration::ZERO);

    let value = policy
      .run(Lookup::Age, |attempt| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { if attempt < 3 { Err(status_error()) } else { Ok(attempt) } }
      })
      .await
      .unwrap();

    assert_eq!(value, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn exhausts_with_wrapped_last_error() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy::fixed(3, Duration::ZERO);

    let err = policy
      .run(Lookup::Age, |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>(status_error()) }
      })
      .await
      .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    match err {
      Error::Exhausted { lookup, attempts, last } => {
        assert_eq!(lookup, Lookup::Age);
        assert_eq!(attempts, 3);
        assert!(matches!(*last, Error::Status { status: 503, .. }));
      }
      other => panic!("expected Exhausted, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn parse_failure_is_not_retried() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy::fixed(3, Duration::ZERO);

    let err = policy
      .run(Lookup::Age, |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>(Error::Parse { lookup: Lookup::Age, reason: "no age" }) }
      })
      .await
      .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(err, Error::Parse { .. }));
  }

  #[tokio::test]
  async fn single_attempt_returns_the_error_itself() {
    let err = RetryPolicy::none()
      .run(Lookup::Gender, |_| async { Err::<(), _>(status_error()) })
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Status { .. }));
  }

  #[tokio::test]
  async fn zero_attempts_still_tries_once() {
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy::fixed(0, Duration::ZERO);
    policy
      .run(Lookup::Age, |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
      })
      .await
      .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn waits_between_attempts() {
    let policy = RetryPolicy::fixed(2, Duration::from_millis(20));
    let started = tokio::time::Instant::now();
    let _ = policy
      .run(Lookup::Age, |_| async { Err::<(), _>(status_error()) })
      .await;
    assert!(started.elapsed() >= Duration::from_millis(20));
  }
}
