//! Application layer for conductor
//!
//! This crate contains the executor use case, port definitions, notifications,
//! circuit breaking and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod notification;
pub mod ports;
pub mod resilience;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutorConfig, NotificationConfig};
pub use notification::{
    Notification, NotificationManager, NotificationStats, NotificationSubscriber, NotificationType,
};
pub use ports::{
    alert::DesktopAlert,
    audit::{AuditEntry, AuditLogger, NoAuditLogger},
    compactor::ResultCompactor,
    execution_handler::{ExecutionHandler, NoExecutionHandler},
    hooks::{HookError, HooksRunner, NoHooks},
    llm_client::{LlmClient, LlmError, ResponseStream},
    permission::{PermissionChecker, PermissionError, PermissionResponse},
    redactor::SecretRedactor,
    tool::{Tool, ToolContext, ToolLookup},
};
pub use resilience::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitState};
pub use use_cases::executor::{ExecuteOutput, Executor, ExecutorBuilder, ExecutorError};
