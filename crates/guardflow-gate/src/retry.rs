//! Deadline-bounded retry with exponential backoff
//!
//! The generic leaf of the gate: runs an operation until it succeeds, fails
//! with a code outside the call site's allow-list, or the budget elapses.

use crate::classify::is_retryable;
use crate::error::{ApiError, GateError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Backoff policy (exponential, capped)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Initial delay between attempts (milliseconds)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    /// Delay ceiling (milliseconds); keeps the attempt count bounded even on
    /// very long budgets
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    /// Growth factor applied per attempt
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_initial_delay() -> u64 {
    500
}
fn default_max_delay() -> u64 {
    10_000 // 10s
}
fn default_multiplier() -> f64 {
    2.0
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
        }
    }
}

impl BackoffConfig {
    /// Delay before the retry that follows attempt number `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        Duration::from_millis((delay as u64).min(self.max_delay_ms))
    }
}

/// Run `operation` until it succeeds, fails terminally, or `budget` elapses.
///
/// - Success returns immediately; a never-failing operation runs exactly once
///   with no sleep, for any budget including zero.
/// - An error whose code is not in `retryable_codes` is terminal and returned
///   unchanged after exactly one invocation.
/// - A retryable error sleeps the current backoff delay (clamped to the
///   remaining budget) and tries again against the same absolute deadline.
/// - Budget exhaustion while the latest error was still retryable returns
///   [`GateError::DeadlineExceeded`] wrapping that last error.
pub async fn retry_until<T, F, Fut, C>(
    budget: Duration,
    backoff: &BackoffConfig,
    mut operation: F,
    retryable_codes: &[C],
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, ApiError>>,
    C: AsRef<str>,
{
    let deadline = Instant::now() + budget;
    let mut attempt: u32 = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retryable(err.code(), retryable_codes) {
                    return Err(GateError::Api(err));
                }

                let now = Instant::now();
                if now >= deadline {
                    return Err(GateError::DeadlineExceeded {
                        budget,
                        attempts: attempt + 1,
                        last: err,
                    });
                }

                let delay = backoff.delay_for_attempt(attempt).min(deadline - now);
                tracing::debug!(
                    code = err.code(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "transient error, retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    const NO_CODES: [&str; 0] = [];

    fn fast_backoff() -> BackoffConfig {
        BackoffConfig {
            initial_delay_ms: 20,
            max_delay_ms: 80,
            multiplier: 2.0,
        }
    }

    #[test]
    fn test_delay_calculation() {
        let backoff = BackoffConfig {
            initial_delay_ms: 1000,
            max_delay_ms: 10_000,
            multiplier: 2.0,
        };

        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(1000));
        assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(2000));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(4000));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_millis(8000));
        assert_eq!(backoff.delay_for_attempt(4), Duration::from_millis(10_000)); // capped at max
    }

    #[tokio::test]
    async fn test_success_runs_exactly_once() {
        let calls = AtomicU32::new(0);

        let result = retry_until(
            Duration::from_secs(5),
            &fast_backoff(),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, ApiError>(42) }
            },
            &NO_CODES,
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_budget_still_attempts_once() {
        let calls = AtomicU32::new(0);

        let result = retry_until(
            Duration::ZERO,
            &fast_backoff(),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, ApiError>("done") }
            },
            &["Throttling"],
        )
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_terminal_error_returns_after_one_call() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result: Result<()> = retry_until(
            Duration::from_secs(5),
            &fast_backoff(),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ApiError::new("Other", "not transient")) }
            },
            &["Throttled"],
        )
        .await;

        let err = result.unwrap_err();
        assert!(!err.is_deadline_exceeded());
        assert_eq!(err.api_error().code(), "Other");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = retry_until(
            Duration::from_secs(5),
            &fast_backoff(),
            || {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call == 0 {
                        Err(ApiError::new("Busy", "try later"))
                    } else {
                        Ok("recovered")
                    }
                }
            },
            &["Throttled", "Busy"],
        )
        .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // One backoff sleep happened before the second attempt.
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_always_transient_hits_deadline() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result: Result<()> = retry_until(
            Duration::from_millis(200),
            &fast_backoff(),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ApiError::new("Busy", "still busy")) }
            },
            &["Busy"],
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.is_deadline_exceeded());
        assert_eq!(err.api_error().code(), "Busy");
        assert!(calls.load(Ordering::SeqCst) > 1);
        // Deadline respected: delays are clamped to the remaining budget.
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert!(started.elapsed() < Duration::from_millis(600));
    }
}
