//! Per-call tool pipeline.
//!
//! Every call goes through the same stages, in this order:
//!
//! | # | Stage | On failure |
//! |---|-------|------------|
//! | 1 | Circuit breaker gate | error result, tool not invoked |
//! | 2 | Lookup + `validate` | `validation error: …` |
//! | 3 | Safety pre-flight | denial notification, error result |
//! | 4 | Execution summary | – |
//! | 5 | Permission check | denial notification, error result |
//! | 6 | Pre-tool hook | logged only |
//! | 7 | Timed, cancellable execution with heartbeat | error result |
//! | 8 | Metadata (duration, safety level, summary) | – |
//! | 9 | Secret redaction | – |
//! | 10 | Audit entry | – |
//! | 11 | Post-tool / on-error hook | logged only |
//! | 12 | Compaction of successful results | – |
//! | 13 | Completion notification, `on_tool_end`, log | – |
//!
//! Redaction runs before the audit entry is written so the audit trail
//! never holds secrets.

use super::types::ExecutionInfo;
use crate::config::ExecutorConfig;
use crate::notification::NotificationManager;
use crate::ports::audit::{AuditEntry, AuditLogger, SAFETY_LEVEL_KEY, SAFETY_WARNINGS_KEY};
use crate::ports::compactor::ResultCompactor;
use crate::ports::execution_handler::ExecutionHandler;
use crate::ports::hooks::HooksRunner;
use crate::ports::permission::PermissionChecker;
use crate::ports::redactor::SecretRedactor;
use crate::ports::tool::{Tool, ToolContext, ToolLookup};
use crate::resilience::{CircuitBreaker, CircuitBreakerError};
use crate::use_cases::tool_helpers::tool_args_preview;
use conductor_domain::{
    SafetyContext, SafetyValidator, ToolCall, ToolError, ToolResult, format_duration,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a call left the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    /// The tool ran (successfully or not)
    Ran,
    /// Stopped before execution; completion notification still due
    Rejected,
    /// Stopped by safety or permissions; denial already notified
    Denied,
}

/// Shared state behind the executor, cloned into dispatch tasks.
pub(crate) struct ToolPipeline {
    pub(crate) tools: Arc<dyn ToolLookup>,
    pub(crate) config: ExecutorConfig,
    pub(crate) safety: SafetyValidator,
    pub(crate) breakers: Mutex<HashMap<String, Arc<CircuitBreaker>>>,
    pub(crate) permissions: Option<Arc<dyn PermissionChecker>>,
    pub(crate) hooks: Arc<dyn HooksRunner>,
    pub(crate) audit: Arc<dyn AuditLogger>,
    pub(crate) redactor: Option<Arc<dyn SecretRedactor>>,
    pub(crate) compactor: Option<Arc<dyn ResultCompactor>>,
    pub(crate) notifications: Arc<NotificationManager>,
    pub(crate) handler: Arc<dyn ExecutionHandler>,
}

impl ToolPipeline {
    /// The breaker for `tool_name`, created on first use.
    pub(crate) fn breaker_for(&self, tool_name: &str) -> Arc<CircuitBreaker> {
        let mut breakers = self.breakers.lock().unwrap_or_else(|e| e.into_inner());
        breakers
            .entry(tool_name.to_string())
            .or_insert_with(|| Arc::new(CircuitBreaker::new(tool_name, self.config.breaker)))
            .clone()
    }

    pub(crate) fn existing_breaker(&self, tool_name: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(tool_name)
            .cloned()
    }

    /// Run one call through every stage and return its final result.
    pub(crate) async fn execute_tool(&self, cancel: &CancellationToken, call: &ToolCall) -> ToolResult {
        self.handler.on_tool_start(call);
        debug!(
            tool = %call.tool_name,
            call_id = %call.id,
            args = %tool_args_preview(call),
            "Executing tool call"
        );

        let breaker = self.breaker_for(&call.tool_name);
        let outcome = breaker
            .execute(|| async {
                let result = self.run(cancel, call).await;
                if result.success { Ok(result) } else { Err(result) }
            })
            .await;

        match outcome {
            Ok(result) | Err(CircuitBreakerError::Inner(result)) => result,
            Err(open @ CircuitBreakerError::Open { .. }) => {
                warn!(tool = %call.tool_name, call_id = %call.id, "Circuit breaker rejected call");
                let info = self.info_for(call);
                let result = ToolResult::failure(&call.tool_name, open.to_string());
                self.finish(call, &info, result, Exit::Rejected).await
            }
        }
    }

    fn info_for(&self, call: &ToolCall) -> ExecutionInfo {
        ExecutionInfo::new(
            call,
            self.safety.level(&call.tool_name),
            self.config.parent_tool.clone(),
        )
    }

    async fn run(&self, cancel: &CancellationToken, call: &ToolCall) -> ToolResult {
        let name = call.tool_name.as_str();
        let args = &call.arguments;
        let mut info = self.info_for(call);

        // Lookup & validate
        let Some(tool) = self.tools.get(name) else {
            let result = ToolResult::failure(name, format!("Unknown tool: {}", name));
            return self.finish(call, &info, result, Exit::Rejected).await;
        };
        if let Err(e) = tool.validate(args) {
            let result = ToolResult::failure(name, format!("validation error: {}", e));
            return self.finish(call, &info, result, Exit::Rejected).await;
        }

        // Safety pre-flight
        if self.config.safety_checks {
            self.handler.on_tool_validating(name);
            let ctx = SafetyContext {
                confirmed: self.config.confirmed,
            };
            let check = self.safety.pre_flight(name, args, &ctx);
            for warning in &check.warnings {
                self.notifications.tool_warning(name, warning, None);
                self.handler.on_warning(name, warning);
            }
            let valid = check.is_valid;
            let reason = check.error_message();
            info.pre_flight = Some(check);

            if !valid {
                let summary = self.safety.get_summary(name, args);
                info.summary = Some(summary.clone());
                self.notifications.tool_denied(name, &reason, Some(summary));
                self.handler.on_tool_denied(name, &reason);
                let result = ToolResult::failure(name, format!("safety check failed: {}", reason));
                return self.finish(call, &info, result, Exit::Denied).await;
            }
        }

        let summary = self.safety.get_summary(name, args);
        info.summary = Some(summary.clone());

        // Permission gate
        if let Some(permissions) = &self.permissions {
            let denial = match permissions.check(name, args).await {
                Ok(response) if response.allowed => None,
                Ok(response) => Some(
                    response
                        .reason
                        .unwrap_or_else(|| "denied by permission policy".to_string()),
                ),
                Err(e) => Some(e.to_string()),
            };

            match denial {
                Some(reason) => {
                    self.notifications
                        .tool_denied(name, &reason, Some(summary.clone()));
                    self.handler.on_tool_denied(name, &reason);
                    let result =
                        ToolResult::failure(name, format!("permission denied: {}", reason));
                    return self.finish(call, &info, result, Exit::Denied).await;
                }
                None if summary.user_visible => {
                    self.notifications.tool_approved(name, &summary);
                    self.handler.on_tool_approved(name);
                }
                None => {}
            }
        }

        if let Err(e) = self.hooks.run_pre_tool(name, args).await {
            warn!(tool = %name, error = %e, "Pre-tool hook failed");
        }

        let result = self.run_timed(tool.as_ref(), cancel, call).await;
        self.finish(call, &info, result, Exit::Ran).await
    }

    /// Execute with a child token, a timeout and a progress heartbeat.
    async fn run_timed(
        &self,
        tool: &dyn Tool,
        cancel: &CancellationToken,
        call: &ToolCall,
    ) -> ToolResult {
        let name = call.tool_name.as_str();
        let child = cancel.child_token();
        // Cancels the child (and stops the heartbeat) however this scope ends
        let _guard = child.clone().drop_guard();
        self.spawn_heartbeat(name, child.clone());

        let ctx = ToolContext::new(child.clone(), &call.id)
            .with_working_dir(self.config.working_dir.clone());
        let timeout = self.config.tool_timeout;

        let outcome = tokio::select! {
            biased;
            _ = child.cancelled() => Err(ToolError::cancelled()),
            res = tokio::time::timeout(timeout, tool.execute(&ctx, &call.arguments)) => match res {
                Ok(inner) => inner,
                Err(_) => Err(ToolError::timeout(format!(
                    "{} exceeded {}",
                    name,
                    format_duration(timeout)
                ))),
            },
        };

        match outcome {
            Ok(mut result) => {
                result.tool_name = name.to_string();
                result
            }
            Err(e) => {
                warn!(tool = %name, call_id = %call.id, error = %e, "Tool execution failed");
                ToolResult::from_error(name, &e)
            }
        }
    }

    fn spawn_heartbeat(&self, tool_name: &str, token: CancellationToken) {
        let period = self.config.heartbeat_interval;
        if period.is_zero() {
            return;
        }
        let handler = Arc::clone(&self.handler);
        let notifications = Arc::clone(&self.notifications);
        let tool_name = tool_name.to_string();
        let started = tokio::time::Instant::now();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(started + period, period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let elapsed = started.elapsed();
                        handler.on_tool_progress(&tool_name, elapsed);
                        notifications.tool_progress(
                            &tool_name,
                            format!("{} still running ({})", tool_name, format_duration(elapsed)),
                        );
                    }
                }
            }
        });
    }

    /// Shared tail: metadata, redaction, audit, hooks, compaction, notify.
    async fn finish(
        &self,
        call: &ToolCall,
        info: &ExecutionInfo,
        mut result: ToolResult,
        exit: Exit,
    ) -> ToolResult {
        let elapsed = info.start_time.elapsed();
        result.tool_name = info.tool_name.clone();
        result.duration = Some(format_duration(elapsed));
        result.safety_level = Some(info.safety_level);
        if result.execution_summary.is_none() {
            result.execution_summary = info.summary.clone();
        }

        if let Some(redactor) = &self.redactor {
            result.content = redactor.redact(&result.content);
            result.error = result.error.as_deref().map(|e| redactor.redact(e));
        }

        self.audit.log(self.audit_entry(info, &result, elapsed.as_millis() as u64));

        if exit == Exit::Ran {
            let hook = if result.success {
                self.hooks
                    .run_post_tool(&info.tool_name, &info.args, &result)
                    .await
            } else {
                let error = result.error.clone().unwrap_or_default();
                self.hooks
                    .run_on_error(&info.tool_name, &info.args, &error)
                    .await
            };
            if let Err(e) = hook {
                warn!(tool = %info.tool_name, error = %e, "Post-tool hook failed");
            }
        }

        if result.success {
            if let Some(compactor) = &self.compactor {
                result = compactor.compact_for_type(&info.tool_name, result);
            }
        }

        if exit != Exit::Denied {
            self.notifications.tool_completed(&result);
        }
        self.handler.on_tool_end(&info.tool_name, &result);

        info!(
            tool = %info.tool_name,
            call_id = %call.id,
            parent_tool = info.parent_tool.as_deref().unwrap_or(""),
            duration_ms = elapsed.as_millis() as u64,
            success = result.success,
            safety_level = %info.safety_level,
            "Tool call finished"
        );
        result
    }

    fn audit_entry(&self, info: &ExecutionInfo, result: &ToolResult, duration_ms: u64) -> AuditEntry {
        let mut args = info.args.clone();
        args.insert(
            SAFETY_LEVEL_KEY.to_string(),
            serde_json::Value::String(info.safety_level.to_string()),
        );
        args.insert(
            SAFETY_WARNINGS_KEY.to_string(),
            serde_json::Value::from(info.warnings().to_vec()),
        );

        AuditEntry {
            session_id: self.config.session_id.clone(),
            call_id: info.call_id.clone(),
            tool_name: info.tool_name.clone(),
            args,
            content: result.content.clone(),
            success: result.success,
            error: result.error.clone(),
            duration_ms,
        }
    }
}
