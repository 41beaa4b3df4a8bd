//! Infrastructure layer for conductor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: built-in tools, the JSONL audit log, secret
//! redaction, result compaction, permission policy, desktop alerts, a
//! scripted LLM client and configuration file loading.

pub mod alert;
pub mod compaction;
pub mod config;
pub mod llm;
pub mod logging;
pub mod permissions;
pub mod redaction;
pub mod tools;

// Re-export commonly used types
pub use alert::OsDesktopAlert;
pub use compaction::TruncatingCompactor;
pub use config::{
    ConfigLoader, ConfigValidationError, FileAuditConfig, FileCompactionConfig, FileConfig,
    FileExecutorConfig, FileNotificationsConfig, FilePermissionsConfig, FileRedactionConfig,
};
pub use llm::{ScriptError, ScriptTurn, ScriptedConversation, ScriptedLlmClient};
pub use logging::JsonlAuditLogger;
pub use permissions::StaticPermissionPolicy;
pub use redaction::{RegexSecretRedactor, SecretPattern};
pub use tools::{BashTool, EditTool, GlobTool, GrepTool, ReadTool, ToolRegistry, WriteTool};
