//! Circuit breaker for tool calls.
//!
//! One breaker guards one tool name. Consecutive failures trip it; while open
//! every call is rejected without running. After the cooldown a single trial
//! call is let through and its outcome decides whether the breaker closes or
//! opens again.
//!
//! # States
//!
//! ```text
//! ┌─────────┐   failure_threshold   ┌────────┐
//! │ CLOSED  │ ─────────────────────▶│  OPEN  │
//! │(normal) │   consecutive fails   │(reject)│
//! └─────────┘                       └────────┘
//!      ▲                                 │
//!      │ trial succeeds                  │ cooldown elapsed
//!      │                                 ▼
//!      │                          ┌───────────┐
//!      └──────────────────────────│ HALF_OPEN │──▶ trial fails: OPEN
//!                                 │ (1 trial) │
//!                                 └───────────┘
//! ```

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Current state of a circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, calls allowed
    Closed,
    /// Tripped, calls rejected
    Open,
    /// Cooldown elapsed, one trial call allowed
    HalfOpen,
}

/// Configuration for a circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens
    pub failure_threshold: u32,
    /// How long the circuit stays open before a trial call
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown: Duration::from_secs(60),
        }
    }
}

impl CircuitBreakerConfig {
    pub fn failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }
}

/// Error from [`CircuitBreaker::execute`].
#[derive(Error, Debug)]
pub enum CircuitBreakerError<E> {
    /// The breaker rejected the call without running it.
    #[error("Circuit breaker for '{name}' is open; retry in {}s", retry_in.as_secs().max(1))]
    Open { name: String, retry_in: Duration },

    /// The call ran and failed.
    #[error("{0}")]
    Inner(E),
}

/// Snapshot of a breaker for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitBreakerStats {
    pub name: String,
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub failure_threshold: u32,
    pub last_failure: Option<Instant>,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    last_failure: Option<Instant>,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Failure-counting gate around a fallible async operation.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(BreakerState {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                last_failure: None,
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state, accounting for an elapsed cooldown.
    pub fn state(&self) -> CircuitState {
        let inner = self.lock();
        match inner.state {
            CircuitState::Open if self.cooldown_elapsed(&inner) => CircuitState::HalfOpen,
            state => state,
        }
    }

    pub fn stats(&self) -> CircuitBreakerStats {
        let state = self.state();
        let inner = self.lock();
        CircuitBreakerStats {
            name: self.name.clone(),
            state,
            consecutive_failures: inner.consecutive_failures,
            failure_threshold: self.config.failure_threshold,
            last_failure: inner.last_failure,
        }
    }

    /// Run `f` through the breaker.
    ///
    /// `Err` from `f` counts as a failure; `Ok` resets the failure count.
    pub async fn execute<F, Fut, T, E>(&self, f: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let trial = self.acquire::<E>()?;
        let mut guard = TrialGuard {
            breaker: self,
            armed: trial,
        };

        let outcome = f().await;
        guard.armed = false;

        match outcome {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                self.record_failure();
                Err(CircuitBreakerError::Inner(e))
            }
        }
    }

    /// Force the breaker back to closed.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.opened_at = None;
        inner.trial_in_flight = false;
        tracing::info!(circuit = %self.name, "Circuit breaker manually reset");
    }

    // ==================== Private ====================

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        // State stays consistent even if a holder panicked
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cooldown_elapsed(&self, inner: &BreakerState) -> bool {
        inner
            .opened_at
            .is_some_and(|at| at.elapsed() >= self.config.cooldown)
    }

    /// Admit a call; returns whether it is the half-open trial.
    fn acquire<E>(&self) -> Result<bool, CircuitBreakerError<E>> {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => Ok(false),
            CircuitState::Open if self.cooldown_elapsed(&inner) => {
                inner.state = CircuitState::HalfOpen;
                inner.trial_in_flight = true;
                tracing::debug!(circuit = %self.name, "Circuit breaker half-open, allowing trial call");
                Ok(true)
            }
            CircuitState::HalfOpen if !inner.trial_in_flight => {
                inner.trial_in_flight = true;
                Ok(true)
            }
            CircuitState::Open | CircuitState::HalfOpen => {
                let retry_in = inner
                    .opened_at
                    .map(|at| self.config.cooldown.saturating_sub(at.elapsed()))
                    .unwrap_or(self.config.cooldown);
                Err(CircuitBreakerError::Open {
                    name: self.name.clone(),
                    retry_in,
                })
            }
        }
    }

    fn record_success(&self) {
        let mut inner = self.lock();
        if inner.state != CircuitState::Closed {
            tracing::info!(circuit = %self.name, "Circuit breaker closed after successful trial");
        }
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.opened_at = None;
        inner.trial_in_flight = false;
    }

    fn record_failure(&self) {
        let mut inner = self.lock();
        let now = Instant::now();
        inner.consecutive_failures += 1;
        inner.last_failure = Some(now);
        inner.trial_in_flight = false;

        let trip = match inner.state {
            CircuitState::HalfOpen => true,
            CircuitState::Closed => inner.consecutive_failures >= self.config.failure_threshold,
            CircuitState::Open => false,
        };
        if trip {
            inner.state = CircuitState::Open;
            inner.opened_at = Some(now);
            tracing::warn!(
                circuit = %self.name,
                failures = inner.consecutive_failures,
                cooldown_secs = self.config.cooldown.as_secs(),
                "Circuit breaker opened"
            );
        }
    }
}

/// Releases the half-open slot if the trial future is dropped mid-flight.
struct TrialGuard<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for TrialGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.breaker.lock().trial_in_flight = false;
        }
    }
}
