//! Executor use case
//!
//! Drives the function-calling loop: the model proposes tool calls, the
//! executor runs them through the [`pipeline`] and sends the results back,
//! until the model answers in plain text or the iteration budget runs out.
//!
//! ```text
//! user message ─▶ history ─▶ LlmClient ─┬─▶ text ─────────────▶ ExecuteOutput
//!                                       └─▶ function calls
//!                                              │ dispatch (inline / parallel)
//!                                              ▼
//!                                     function-response turn ─▶ LlmClient ─▶ …
//! ```
//!
//! When the budget is exhausted without final text, a deterministic answer
//! is synthesized from the last tool result (see
//! [`fallback_text`](conductor_domain::agent::fallback_text)).

mod dispatch;
mod pipeline;
mod types;

#[cfg(test)]
mod tests;

pub use types::{ExecuteOutput, ExecutionInfo, ExecutorError};

use crate::config::ExecutorConfig;
use crate::notification::NotificationManager;
use crate::ports::audit::{AuditLogger, NoAuditLogger};
use crate::ports::compactor::ResultCompactor;
use crate::ports::execution_handler::{ExecutionHandler, NoExecutionHandler};
use crate::ports::hooks::{HooksRunner, NoHooks};
use crate::ports::llm_client::{LlmClient, LlmError, ResponseStream};
use crate::ports::permission::PermissionChecker;
use crate::ports::redactor::SecretRedactor;
use crate::ports::tool::ToolLookup;
use crate::resilience::{CircuitBreakerStats, CircuitState};
use conductor_domain::{
    Content, FunctionResponse, History, LlmResponse, SafetyValidator, TokenUsage, ToolResult,
    calculate_max_iterations, fallback_text,
};
use dispatch::dispatch_calls;
use pipeline::ToolPipeline;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs conversations against an [`LlmClient`] with a set of tools.
pub struct Executor {
    llm: Arc<dyn LlmClient>,
    pipeline: Arc<ToolPipeline>,
}

impl Executor {
    pub fn builder(llm: Arc<dyn LlmClient>, tools: Arc<dyn ToolLookup>) -> ExecutorBuilder {
        ExecutorBuilder::new(llm, tools)
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.pipeline.config
    }

    pub fn notifications(&self) -> &Arc<NotificationManager> {
        &self.pipeline.notifications
    }

    /// Breaker state for `tool_name`, if the tool has been called.
    pub fn circuit_state(&self, tool_name: &str) -> Option<CircuitState> {
        self.pipeline
            .existing_breaker(tool_name)
            .map(|b| b.state())
    }

    pub fn circuit_stats(&self) -> Vec<CircuitBreakerStats> {
        let breakers = self
            .pipeline
            .breakers
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let mut stats: Vec<_> = breakers.values().map(|b| b.stats()).collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }

    /// Close the breaker for `tool_name`. Returns false if none exists.
    pub fn reset_circuit(&self, tool_name: &str) -> bool {
        match self.pipeline.existing_breaker(tool_name) {
            Some(breaker) => {
                breaker.reset();
                true
            }
            None => false,
        }
    }

    /// Append `message` to `history` and run the loop until a final answer.
    ///
    /// `history` is borrowed exclusively for the whole run. On error it keeps
    /// every turn appended before the failure.
    pub async fn execute(
        &self,
        cancel: &CancellationToken,
        history: &mut History,
        message: &str,
    ) -> Result<ExecuteOutput, ExecutorError> {
        let result = self.run_loop(cancel, history, message).await;
        if let Err(e) = &result {
            self.pipeline.handler.on_error(&e.to_string());
        }
        result
    }

    async fn run_loop(
        &self,
        cancel: &CancellationToken,
        history: &mut History,
        message: &str,
    ) -> Result<ExecuteOutput, ExecutorError> {
        history.push_user_text(message);

        let max_iterations = self
            .pipeline
            .config
            .max_iterations
            .unwrap_or_else(|| calculate_max_iterations(history));
        info!(
            session_id = %self.pipeline.config.session_id,
            max_iterations,
            "Starting execution"
        );

        let mut usage = TokenUsage::default();
        let mut tools_used: Vec<String> = Vec::new();
        let mut last_result: Option<ToolResult> = None;

        for iteration in 1..=max_iterations {
            check_cancelled(cancel)?;
            debug!(iteration, "Execution iteration");

            let (prior, user_message) = history.split_last_user_message()?;
            let stream = self
                .llm
                .send_message_with_history(cancel, &prior, &user_message);
            let mut response = self.receive(cancel, stream).await?;
            record(history, &mut usage, &response);

            while response.has_function_calls() {
                check_cancelled(cancel)?;
                let calls = std::mem::take(&mut response.function_calls);
                let results = dispatch_calls(&self.pipeline, cancel, &calls).await;

                tools_used.extend(calls.iter().map(|c| c.tool_name.clone()));
                last_result = results.last().cloned();

                let responses: Vec<FunctionResponse> = calls
                    .iter()
                    .zip(&results)
                    .map(|(call, result)| FunctionResponse {
                        id: call.id.clone(),
                        name: call.tool_name.clone(),
                        response: result.to_response_value(),
                    })
                    .collect();
                history.push(Content::function_responses(responses.clone()));

                let prior = &history.turns()[..history.len() - 1];
                let stream = self.llm.send_function_response(cancel, prior, &responses);
                response = self.receive(cancel, stream).await?;
                record(history, &mut usage, &response);
            }

            if !response.text.trim().is_empty() {
                info!(
                    iterations = iteration,
                    tools = tools_used.len(),
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    "Execution finished"
                );
                return Ok(ExecuteOutput {
                    final_text: response.text,
                    usage,
                    tools_used,
                    iterations: iteration,
                    used_fallback: false,
                });
            }
        }

        warn!(
            max_iterations,
            tools = tools_used.len(),
            "Iteration budget exhausted without final text; synthesizing answer"
        );
        Ok(ExecuteOutput {
            final_text: fallback_text(&tools_used, last_result.as_ref()),
            usage,
            tools_used,
            iterations: max_iterations,
            used_fallback: true,
        })
    }

    /// Await a model call and collect its stream, racing cancellation.
    async fn receive(
        &self,
        cancel: &CancellationToken,
        request: impl Future<Output = Result<ResponseStream, LlmError>>,
    ) -> Result<LlmResponse, ExecutorError> {
        let handler = Arc::clone(&self.pipeline.handler);
        let exchange = async move {
            let stream = request.await?;
            stream.collect_with(|chunk| handler.on_text(chunk)).await
        };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ExecutorError::Cancelled),
            response = exchange => Ok(response?),
        }
    }
}

fn check_cancelled(cancel: &CancellationToken) -> Result<(), ExecutorError> {
    if cancel.is_cancelled() {
        return Err(ExecutorError::Cancelled);
    }
    Ok(())
}

/// Append a model reply to history and add its usage.
fn record(history: &mut History, usage: &mut TokenUsage, response: &LlmResponse) {
    if let Some(reported) = response.usage() {
        usage.add(reported);
    }
    let content = Content::model(&response.text, &response.function_calls);
    if !content.parts.is_empty() {
        history.push(content);
    }
}

/// Assembles an [`Executor`] and its collaborators.
pub struct ExecutorBuilder {
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolLookup>,
    config: ExecutorConfig,
    permissions: Option<Arc<dyn PermissionChecker>>,
    hooks: Arc<dyn HooksRunner>,
    audit: Arc<dyn AuditLogger>,
    redactor: Option<Arc<dyn SecretRedactor>>,
    compactor: Option<Arc<dyn ResultCompactor>>,
    notifications: Option<Arc<NotificationManager>>,
    handler: Arc<dyn ExecutionHandler>,
}

impl ExecutorBuilder {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<dyn ToolLookup>) -> Self {
        Self {
            llm,
            tools,
            config: ExecutorConfig::default(),
            permissions: None,
            hooks: Arc::new(NoHooks),
            audit: Arc::new(NoAuditLogger),
            redactor: None,
            compactor: None,
            notifications: None,
            handler: Arc::new(NoExecutionHandler),
        }
    }

    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn permissions(mut self, checker: Arc<dyn PermissionChecker>) -> Self {
        self.permissions = Some(checker);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn HooksRunner>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn audit(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn redactor(mut self, redactor: Arc<dyn SecretRedactor>) -> Self {
        self.redactor = Some(redactor);
        self
    }

    pub fn compactor(mut self, compactor: Arc<dyn ResultCompactor>) -> Self {
        self.compactor = Some(compactor);
        self
    }

    pub fn notifications(mut self, notifications: Arc<NotificationManager>) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn handler(mut self, handler: Arc<dyn ExecutionHandler>) -> Self {
        self.handler = handler;
        self
    }

    pub fn build(self) -> Executor {
        Executor {
            llm: self.llm,
            pipeline: Arc::new(ToolPipeline {
                tools: self.tools,
                config: self.config,
                safety: SafetyValidator::new(),
                breakers: Mutex::new(HashMap::new()),
                permissions: self.permissions,
                hooks: self.hooks,
                audit: self.audit,
                redactor: self.redactor,
                compactor: self.compactor,
                notifications: self.notifications.unwrap_or_default(),
                handler: self.handler,
            }),
        }
    }
}
