//! Circuit breaker guarding calls to downstream services.
//!
//! Closed circuits pass calls through and count consecutive failures. Once
//! the threshold is reached the circuit opens and calls fail fast until the
//! reset timeout elapses; then a limited number of probe calls is admitted
//! (half-open). A probe success closes the circuit, a probe failure opens it
//! again. Every admitted call is bounded by the configured call timeout.

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::time::Instant;

use crate::config::CircuitBreakerSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CircuitState {
    #[default]
    Closed,
    Open,
    HalfOpen,
}

/// Snapshot for logging and tests.
#[derive(Debug, Clone, Default)]
pub struct CircuitStats {
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub total_successes: u64,
    pub total_failures: u64,
    pub rejected_calls: u64,
}

/// Why a guarded call produced no value.
#[derive(Debug, Error)]
pub enum CallError<E> {
    #[error("circuit '{0}' is open")]
    Open(&'static str),
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Inner(E),
}

#[derive(Debug, Default)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    total_successes: u64,
    total_failures: u64,
    rejected_calls: u64,
    opened_at: Option<Instant>,
    half_open_calls_remaining: u32,
}

pub struct CircuitBreaker {
    name: &'static str,
    settings: CircuitBreakerSettings,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    #[must_use]
    pub fn new(name: &'static str, settings: CircuitBreakerSettings) -> Self {
        Self {
            name,
            settings,
            inner: Mutex::new(BreakerState::default()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    #[must_use]
    pub fn stats(&self) -> CircuitStats {
        let s = self.inner.lock();
        CircuitStats {
            state: s.state,
            consecutive_failures: s.consecutive_failures,
            total_successes: s.total_successes,
            total_failures: s.total_failures,
            rejected_calls: s.rejected_calls,
        }
    }

    /// Run `fut` through the breaker.
    ///
    /// # Errors
    /// `Open` when the call was rejected, `Timeout` when it exceeded the call
    /// timeout, `Inner` when the call itself failed. The latter two count as
    /// failures.
    pub async fn call<T, E, F>(&self, fut: F) -> Result<T, CallError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let Some(permit) = self.try_acquire() else {
            return Err(CallError::Open(self.name));
        };

        let limit = Duration::from_millis(self.settings.call_timeout_ms);
        match tokio::time::timeout(limit, fut).await {
            Ok(Ok(value)) => {
                permit.succeed();
                Ok(value)
            }
            Ok(Err(e)) => {
                permit.fail();
                Err(CallError::Inner(e))
            }
            Err(_) => {
                permit.fail();
                Err(CallError::Timeout(limit))
            }
        }
    }

    /// Admit a call if the circuit allows it. Moves an expired open circuit
    /// to half-open.
    ///
    /// A permit dropped without an outcome hands its half-open slot back.
    #[must_use]
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut s = self.inner.lock();
        let half_open = match s.state {
            CircuitState::Closed => false,
            CircuitState::Open => {
                let reset = Duration::from_millis(self.settings.reset_timeout_ms);
                if s.opened_at.is_some_and(|at| at.elapsed() >= reset) {
                    tracing::info!(circuit = self.name, "Circuit half-open, probing");
                    s.state = CircuitState::HalfOpen;
                    s.consecutive_failures = 0;
                    s.half_open_calls_remaining = self.settings.half_open_max_calls.saturating_sub(1);
                    true
                } else {
                    s.rejected_calls += 1;
                    return None;
                }
            }
            CircuitState::HalfOpen => {
                if s.half_open_calls_remaining > 0 {
                    s.half_open_calls_remaining -= 1;
                    true
                } else {
                    s.rejected_calls += 1;
                    return None;
                }
            }
        };
        Some(Permit {
            breaker: self,
            half_open,
            settled: false,
        })
    }

    fn release_probe(&self) {
        let mut s = self.inner.lock();
        if s.state == CircuitState::HalfOpen
            && s.half_open_calls_remaining < self.settings.half_open_max_calls
        {
            tracing::debug!(circuit = self.name, "Abandoned probe released");
            s.half_open_calls_remaining += 1;
        }
    }

    fn record_success(&self) {
        let mut s = self.inner.lock();
        s.consecutive_failures = 0;
        s.total_successes += 1;

        if s.state == CircuitState::HalfOpen {
            tracing::info!(circuit = self.name, "Circuit closed");
            s.state = CircuitState::Closed;
            s.half_open_calls_remaining = 0;
            s.opened_at = None;
        }
    }

    fn record_failure(&self) {
        let mut s = self.inner.lock();
        s.consecutive_failures += 1;
        s.total_failures += 1;

        let open = match s.state {
            CircuitState::Closed => s.consecutive_failures >= self.settings.failure_threshold,
            CircuitState::HalfOpen => true,
            CircuitState::Open => false,
        };
        if open {
            tracing::warn!(
                circuit = self.name,
                failures = s.consecutive_failures,
                "Circuit opened"
            );
            s.state = CircuitState::Open;
            s.opened_at = Some(Instant::now());
            s.half_open_calls_remaining = 0;
        }
    }
}

/// Admission to one guarded call.
pub struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    half_open: bool,
    settled: bool,
}

impl Permit<'_> {
    pub fn succeed(mut self) {
        self.settled = true;
        self.breaker.record_success();
    }

    pub fn fail(mut self) {
        self.settled = true;
        self.breaker.record_failure();
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.settled && self.half_open {
            self.breaker.release_probe();
        }
    }
}
