//! Config-driven [`PermissionChecker`].
//!
//! Rules are evaluated in order:
//!
//! 1. A tool in `deny` is refused.
//! 2. A non-empty `allow` list refuses every tool it does not name.
//! 3. With `ask_dangerous`, tools rated dangerous or critical need the run to
//!    be confirmed. There is no interactive prompt, so "ask" without
//!    confirmation is a refusal.

use async_trait::async_trait;
use conductor_application::ports::permission::{
    PermissionChecker, PermissionError, PermissionResponse,
};
use conductor_domain::{Arguments, SafetyLevel, SafetyValidator};

#[derive(Debug, Clone, Default)]
pub struct StaticPermissionPolicy {
    allow: Vec<String>,
    deny: Vec<String>,
    ask_dangerous: bool,
    confirmed: bool,
    safety: SafetyValidator,
}

impl StaticPermissionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, tools: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allow.extend(tools.into_iter().map(Into::into));
        self
    }

    pub fn deny(mut self, tools: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.deny.extend(tools.into_iter().map(Into::into));
        self
    }

    pub fn ask_dangerous(mut self, ask: bool) -> Self {
        self.ask_dangerous = ask;
        self
    }

    /// The run was confirmed up front; "ask" rules pass.
    pub fn confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }

    /// Synchronous decision used by [`PermissionChecker::check`].
    pub fn decide(&self, tool_name: &str) -> PermissionResponse {
        if self.deny.iter().any(|t| t == tool_name) {
            return PermissionResponse::deny(format!("'{}' is on the deny list", tool_name));
        }
        if !self.allow.is_empty() && !self.allow.iter().any(|t| t == tool_name) {
            return PermissionResponse::deny(format!("'{}' is not on the allow list", tool_name));
        }
        if self.ask_dangerous && !self.confirmed {
            let level = self.safety.level(tool_name);
            if level >= SafetyLevel::Dangerous {
                return PermissionResponse::deny(format!(
                    "'{}' is {} and needs confirmation (--confirmed)",
                    tool_name, level
                ));
            }
        }
        PermissionResponse::allow()
    }
}

#[async_trait]
impl PermissionChecker for StaticPermissionPolicy {
    async fn check(
        &self,
        tool_name: &str,
        _args: &Arguments,
    ) -> Result<PermissionResponse, PermissionError> {
        let response = self.decide(tool_name);
        if !response.allowed {
            tracing::debug!(tool = %tool_name, reason = ?response.reason, "Permission policy refused call");
        }
        Ok(response)
    }
}
