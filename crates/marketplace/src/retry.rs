//! Bounded retry with exponential backoff.
//!
//! Any collaborator call that can fail transiently (a page that has not
//! hydrated yet, a flaky network hop) goes through [`Retry`] rather than an
//! ad-hoc loop or a fixed sleep.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// A bounded retry schedule: `max_attempts` tries, sleeping
/// `base_delay * 2^(attempt - 1)` between them.
#[derive(Debug, Clone, Copy)]
pub struct Retry {
    max_attempts: u32,
    base_delay: Duration,
}

impl Retry {
    /// Create a schedule. `max_attempts` is clamped to at least 1.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            base_delay,
        }
    }

    /// Run `op` until it succeeds or attempts are exhausted, retrying every
    /// error.
    ///
    /// # Errors
    ///
    /// Returns the last error once attempts are exhausted.
    pub async fn run<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_when(op, |_| true).await
    }

    /// Run `op` until it succeeds, retrying only errors `retryable` accepts.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error immediately, or the last error
    /// once attempts are exhausted.
    pub async fn run_when<T, E, F, Fut, P>(&self, mut op: F, retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && retryable(&err) => {
                    let delay = self.base_delay * 2u32.saturating_pow(attempt - 1);
                    debug!(attempt, ?delay, "retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = Retry::new(3, Duration::ZERO)
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
        assert_eq!(result.expect("ok"), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = Retry::new(3, Duration::ZERO)
            .run(|| async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 { Err("not yet") } else { Ok(n) }
            })
            .await;
        assert_eq!(result.expect("ok"), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = Retry::new(3, Duration::ZERO)
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("always")
            })
            .await;
        assert_eq!(result.expect_err("err"), "always");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_returns_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = Retry::new(3, Duration::ZERO)
            .run_when(
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("fatal")
                },
                |e: &&str| *e != "fatal",
            )
            .await;
        assert_eq!(result.expect_err("err"), "fatal");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_attempts_clamped() {
        let retry = Retry::new(0, Duration::ZERO);
        assert_eq!(retry.max_attempts, 1);
    }
}
