//! Resilience primitives for tool execution.

pub mod circuit_breaker;

pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitBreakerStats, CircuitState,
};
