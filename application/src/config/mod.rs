//! Application-level configuration.
//!
//! - [`ExecutorConfig`]: pipeline and loop control (timeouts, safety, breakers)
//! - [`NotificationConfig`]: notification filtering and delivery

pub mod executor_config;

pub use executor_config::{ExecutorConfig, NotificationConfig};
