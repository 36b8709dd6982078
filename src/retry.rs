//! Retry driver with exponential backoff.
//!
//! Retries are transparent to the circuit breaker: the orchestrator records
//! one breaker outcome per [`with_retry`] invocation, never per attempt.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// How many times to invoke an operation and how long to back off.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of calls, the first one included.
    pub attempts: u32,
    /// Sleep between attempt `i` (0-indexed) and the next is `base_delay * 2^i`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            base_delay: Duration::from_millis(300),
        }
    }
}

/// Classifies errors for the retry driver. Cancellation is the one error the
/// driver must surface immediately instead of retrying.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Invoke `op` up to `policy.attempts` times, sleeping between failures.
///
/// Returns the first success, or the last error once attempts are exhausted
/// or a non-retryable error is hit.
pub async fn with_retry<T, E, Fut, F>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + fmt::Display,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt >= policy.attempts.max(1) || !err.is_retryable() {
                    return Err(err);
                }
                let delay = policy.base_delay * 2u32.saturating_pow(attempt - 1);
                debug!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying after failure");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct TestError {
        message: &'static str,
        retryable: bool,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    fn zero_delay(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            base_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn always_failing_op_runs_exactly_n_times_and_surfaces_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), TestError> = with_retry(&zero_delay(4), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(TestError {
                    message: "boom",
                    retryable: true,
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(result.unwrap_err().message, "boom");
    }

    #[tokio::test]
    async fn stops_on_first_success() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, TestError> = with_retry(&zero_delay(5), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 1 {
                    Ok(42)
                } else {
                    Err(TestError {
                        message: "transient",
                        retryable: true,
                    })
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn immediate_success_is_called_once() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, TestError> = with_retry(&zero_delay(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("done") }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_retryable_errors_surface_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), TestError> = with_retry(&zero_delay(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(TestError {
                    message: "cancelled",
                    retryable: false,
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.unwrap_err().message, "cancelled");
    }
}
