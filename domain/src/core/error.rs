//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid tool call: {0}")]
    InvalidToolCall(String),

    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("History has no user message")]
    NoUserMessage,

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::NoUserMessage.is_cancelled());
        assert!(!DomainError::InvalidToolCall("x".to_string()).is_cancelled());
    }

    #[test]
    fn test_invalid_argument_display() {
        let error = DomainError::InvalidArgument {
            name: "path".to_string(),
            reason: "must not be empty".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid argument 'path': must not be empty"
        );
    }
}
