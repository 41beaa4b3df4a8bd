//! Logging infrastructure: the tool-call audit trail.
//!
//! Provides [`JsonlAuditLogger`], a JSONL file writer that implements
//! the [`AuditLogger`](conductor_application::AuditLogger) port.

mod jsonl_audit_logger;

pub use jsonl_audit_logger::JsonlAuditLogger;
