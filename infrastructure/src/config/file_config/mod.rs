//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application config.

mod audit;
mod compaction;
mod executor;
mod notifications;
mod permissions;
mod redaction;

pub use audit::FileAuditConfig;
pub use compaction::FileCompactionConfig;
pub use executor::FileExecutorConfig;
pub use notifications::FileNotificationsConfig;
pub use permissions::FilePermissionsConfig;
pub use redaction::FileRedactionConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("executor.tool_timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("executor.breaker_failure_threshold cannot be 0")]
    InvalidFailureThreshold,

    #[error("notifications.capacity cannot be 0")]
    InvalidCapacity,

    #[error("redaction pattern '{pattern}' is not a valid regex: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub executor: FileExecutorConfig,
    pub notifications: FileNotificationsConfig,
    pub audit: FileAuditConfig,
    pub redaction: FileRedactionConfig,
    pub compaction: FileCompactionConfig,
    pub permissions: FilePermissionsConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.executor.tool_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.executor.breaker_failure_threshold == 0 {
            return Err(ConfigValidationError::InvalidFailureThreshold);
        }
        if self.notifications.capacity == 0 {
            return Err(ConfigValidationError::InvalidCapacity);
        }
        for pattern in &self.redaction.extra_patterns {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(ConfigValidationError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                });
            }
        }
        Ok(())
    }
}
