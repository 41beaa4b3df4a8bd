//! Pre-flight results and execution summaries.

use super::level::SafetyLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the rule-based checks run before a tool executes.
///
/// Errors make the check invalid; warnings, requirements and suggestions
/// are informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreFlightCheck {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub requirements: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Default for PreFlightCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl PreFlightCheck {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
            requirements: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(error.into());
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// All errors joined into one line.
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// Human-facing description of what a call is about to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub tool_name: String,
    pub display_name: String,
    pub action: String,
    pub target: String,
    pub risk_level: SafetyLevel,
    pub requires_approval: bool,
    pub user_visible: bool,
}

impl ExecutionSummary {
    /// One-line description, e.g. `Read src/main.rs`.
    pub fn describe(&self) -> String {
        if self.target.is_empty() {
            self.action.clone()
        } else {
            format!("{} {}", self.action, self.target)
        }
    }
}

impl fmt::Display for ExecutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Caller-provided facts that relax or tighten pre-flight rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SafetyContext {
    /// The user explicitly confirmed destructive operations for this run.
    pub confirmed: bool,
}

impl SafetyContext {
    pub fn confirmed() -> Self {
        Self { confirmed: true }
    }
}
