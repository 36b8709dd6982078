//! Per-model three-state circuit breaker.
//!
//! The router owns one breaker per model id. Admission (`can_execute`) and
//! outcome recording are synchronous; the state sits behind a mutex with O(1)
//! critical sections. Breaker state is not persisted across restarts.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{info, warn};

/// Breaker state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, calls pass through.
    Closed,
    /// Too many failures, calls are rejected until the timeout elapses.
    Open,
    /// Probing recovery, calls are admitted while successes accumulate.
    HalfOpen,
}

/// Breaker thresholds.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Failures in `Closed` before the circuit opens.
    pub failure_threshold: u32,
    /// Successes in `HalfOpen` before the circuit closes.
    pub success_threshold: u32,
    /// How long the circuit stays `Open` before admitting a probe.
    pub half_open_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            success_threshold: 2,
            half_open_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    last_failure: Option<Instant>,
}

/// Circuit breaker for one model id.
#[derive(Debug)]
pub struct CircuitBreaker {
    model: String,
    config: BreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(model: impl Into<String>, config: BreakerConfig) -> Self {
        Self {
            model: model.into(),
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                last_failure: None,
            }),
        }
    }

    /// Whether a call may be issued right now.
    ///
    /// In `Open`, once the timeout since the last failure has elapsed the
    /// breaker moves to `HalfOpen` and admits the call as a probe.
    pub fn can_execute(&self) -> bool {
        let mut inner = self.inner.lock().expect("breaker state poisoned");
        match inner.state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let elapsed = inner
                    .last_failure
                    .map(|at| at.elapsed() >= self.config.half_open_timeout)
                    .unwrap_or(true);
                if elapsed {
                    info!(model = %self.model, "circuit transitioning Open -> HalfOpen");
                    inner.state = CircuitState::HalfOpen;
                    inner.failure_count = 0;
                    inner.success_count = 0;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record one successful outcome.
    pub fn record_success(&self) {
        let mut inner = self.inner.lock().expect("breaker state poisoned");
        match inner.state {
            CircuitState::Closed => {
                inner.failure_count = 0;
            }
            CircuitState::HalfOpen => {
                inner.success_count += 1;
                if inner.success_count >= self.config.success_threshold {
                    info!(model = %self.model, "circuit transitioning HalfOpen -> Closed");
                    inner.state = CircuitState::Closed;
                    inner.failure_count = 0;
                    inner.success_count = 0;
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record one failed outcome.
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().expect("breaker state poisoned");
        match inner.state {
            CircuitState::Closed => {
                inner.failure_count += 1;
                inner.last_failure = Some(Instant::now());
                if inner.failure_count >= self.config.failure_threshold {
                    warn!(
                        model = %self.model,
                        failures = inner.failure_count,
                        "circuit transitioning Closed -> Open"
                    );
                    inner.state = CircuitState::Open;
                    inner.failure_count = 0;
                    inner.success_count = 0;
                }
            }
            CircuitState::HalfOpen => {
                warn!(model = %self.model, "circuit transitioning HalfOpen -> Open (probe failed)");
                inner.state = CircuitState::Open;
                inner.failure_count = 0;
                inner.success_count = 0;
                inner.last_failure = Some(Instant::now());
            }
            CircuitState::Open => {}
        }
    }

    /// Current state (transition-free snapshot).
    pub fn state(&self) -> CircuitState {
        self.inner.lock().expect("breaker state poisoned").state
    }

    /// Current failure count.
    pub fn failure_count(&self) -> u32 {
        self.inner
            .lock()
            .expect("breaker state poisoned")
            .failure_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(timeout: Duration) -> CircuitBreaker {
        CircuitBreaker::new(
            "test-model",
            BreakerConfig {
                failure_threshold: 3,
                success_threshold: 2,
                half_open_timeout: timeout,
            },
        )
    }

    #[test]
    fn opens_after_three_failures() {
        let b = breaker(Duration::from_secs(60));
        assert!(b.can_execute());
        b.record_failure();
        b.record_failure();
        assert_eq!(b.state(), CircuitState::Closed);
        assert!(b.can_execute());
        b.record_failure();
        assert_eq!(b.state(), CircuitState::Open);
        assert!(!b.can_execute());
    }

    #[test]
    fn success_resets_the_failure_streak_while_closed() {
        let b = breaker(Duration::from_secs(60));
        b.record_failure();
        b.record_failure();
        b.record_success();
        assert_eq!(b.failure_count(), 0);
        b.record_failure();
        b.record_failure();
        assert_eq!(b.state(), CircuitState::Closed);
    }

    #[test]
    fn admits_a_probe_after_the_timeout() {
        let b = breaker(Duration::from_millis(20));
        for _ in 0..3 {
            b.record_failure();
        }
        assert!(!b.can_execute());
        std::thread::sleep(Duration::from_millis(30));
        assert!(b.can_execute());
        assert_eq!(b.state(), CircuitState::HalfOpen);
    }

    #[test]
    fn closes_after_two_probe_successes() {
        let b = breaker(Duration::from_millis(10));
        for _ in 0..3 {
            b.record_failure();
        }
        std::thread::sleep(Duration::from_millis(20));
        assert!(b.can_execute());
        b.record_success();
        assert_eq!(b.state(), CircuitState::HalfOpen);
        b.record_success();
        assert_eq!(b.state(), CircuitState::Closed);
    }

    #[test]
    fn a_single_probe_failure_reopens_immediately() {
        let b = breaker(Duration::from_millis(10));
        for _ in 0..3 {
            b.record_failure();
        }
        std::thread::sleep(Duration::from_millis(20));
        assert!(b.can_execute());
        b.record_success();
        b.record_failure();
        assert_eq!(b.state(), CircuitState::Open);
        // The failure timestamp was refreshed, so the window restarts.
        assert!(!b.can_execute());
    }
}
