//! Permission port
//!
//! Asked after safety pre-flight and before execution whether a call may
//! run. Policy storage is an infrastructure concern.

use async_trait::async_trait;
use conductor_domain::Arguments;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PermissionError {
    #[error("Permission policy error: {0}")]
    Policy(String),

    #[error("Permission prompt unavailable: {0}")]
    Unavailable(String),
}

/// Decision for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionResponse {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl PermissionResponse {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

#[async_trait]
pub trait PermissionChecker: Send + Sync {
    async fn check(
        &self,
        tool_name: &str,
        args: &Arguments,
    ) -> Result<PermissionResponse, PermissionError>;
}
