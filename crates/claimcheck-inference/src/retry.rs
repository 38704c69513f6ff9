//! Retry combinator with exponential backoff
//!
//! One logical inference operation is retried as a whole: each call site
//! (one extraction call, one per-claim verification call) wraps its own
//! operation, never the orchestrated run around it. The final attempt's
//! failure is surfaced unchanged.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Backoff schedule for retrying one inference operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay after the first failed attempt; doubles each retry
    pub base_delay: Duration,

    /// Upper bound on any single backoff delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    /// 3 attempts, exponential backoff starting at 2s capped at 10s
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay after the given 1-based failed attempt
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << doublings)
            .min(self.max_delay)
    }
}

/// Run `op` up to `policy.max_attempts` times, sleeping between attempts.
///
/// `retryable` classifies which failures are worth another attempt; a
/// non-retryable failure is returned immediately. The last attempt's
/// error is returned unchanged, with no further wrapping.
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    policy: RetryPolicy,
    label: &str,
    retryable: R,
    mut op: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < policy.max_attempts && retryable(&error) => {
                let delay = policy.backoff_delay(attempt);
                warn!(
                    stage = label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> =
            retry_with_backoff(fast_policy(), "test", |_| true, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, String> =
            retry_with_backoff(fast_policy(), "test", |_| true, || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("transient".to_string())
                } else {
                    Ok("recovered")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_final_error_surfaced_unchanged() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> =
            retry_with_backoff(fast_policy(), "test", |_| true, || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Err(format!("failure {n}"))
            })
            .await;

        // Three attempts total; the third error comes back as-is
        assert_eq!(result.unwrap_err(), "failure 2");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_failure_returns_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> =
            retry_with_backoff(fast_policy(), "test", |_| false, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("fatal".to_string())
            })
            .await;

        assert_eq!(result.unwrap_err(), "fatal");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_schedule_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(4));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(8));
        assert_eq!(policy.backoff_delay(4), Duration::from_secs(10));
        assert_eq!(policy.backoff_delay(30), Duration::from_secs(10));
    }
}
