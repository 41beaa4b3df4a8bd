//! Port for the tool-call audit trail.
//!
//! Defines the [`AuditLogger`] trait for recording one entry per finished
//! tool call to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures what each
//! call did in a machine-readable format (JSONL).

use conductor_domain::Arguments;
use serde::Serialize;

/// Argument key the executor injects with the call's safety level.
pub const SAFETY_LEVEL_KEY: &str = "_safety_level";
/// Argument key the executor injects with pre-flight warnings.
pub const SAFETY_WARNINGS_KEY: &str = "_safety_warnings";

/// One tool call as it appears in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub session_id: String,
    pub call_id: String,
    pub tool_name: String,
    /// Call arguments plus the injected safety keys
    pub args: Arguments,
    pub content: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Port for writing audit entries.
///
/// The `log` method is intentionally synchronous and non-fallible to avoid
/// disrupting the main execution flow; write failures are ignored.
pub trait AuditLogger: Send + Sync {
    fn log(&self, entry: AuditEntry);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _entry: AuditEntry) {}
}
