//! Flow tests for the executor with scripted model turns and mock tools.

use super::*;
use crate::config::NotificationConfig;
use crate::notification::NotificationType;
use crate::ports::audit::{AuditEntry, SAFETY_LEVEL_KEY, SAFETY_WARNINGS_KEY};
use crate::ports::permission::{PermissionError, PermissionResponse};
use crate::ports::tool::{Tool, ToolContext};
use crate::resilience::CircuitBreakerConfig;
use async_trait::async_trait;
use conductor_domain::agent::NO_TOOLS_FALLBACK;
use conductor_domain::{
    Arguments, Role, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// ==================== Scripted LLM ====================

#[derive(Debug, Clone)]
enum Scripted {
    Reply(LlmResponse),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Request {
    Message { history_len: usize, message: String },
    Functions { history_len: usize, ids: Vec<String>, responses: Vec<serde_json::Value> },
}

/// Mock client that returns scripted replies in order
struct ScriptedLlm {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedLlm {
    fn new(replies: Vec<Scripted>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn next(&self) -> Result<ResponseStream, LlmError> {
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Scripted::Reply(LlmResponse::from_text("(no more responses)")));
        match next {
            Scripted::Reply(response) => Ok(ResponseStream::from_response(response)),
            Scripted::Error(e) => Err(LlmError::RequestFailed(e)),
        }
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn send_message_with_history(
        &self,
        _cancel: &CancellationToken,
        history: &[Content],
        message: &str,
    ) -> Result<ResponseStream, LlmError> {
        self.requests.lock().unwrap().push(Request::Message {
            history_len: history.len(),
            message: message.to_string(),
        });
        self.next()
    }

    async fn send_function_response(
        &self,
        _cancel: &CancellationToken,
        history: &[Content],
        responses: &[FunctionResponse],
    ) -> Result<ResponseStream, LlmError> {
        self.requests.lock().unwrap().push(Request::Functions {
            history_len: history.len(),
            ids: responses.iter().map(|r| r.id.clone()).collect(),
            responses: responses.iter().map(|r| r.response.clone()).collect(),
        });
        self.next()
    }
}

fn text(t: &str) -> Scripted {
    Scripted::Reply(LlmResponse::from_text(t))
}

fn calls(calls: Vec<ToolCall>) -> Scripted {
    Scripted::Reply(LlmResponse::with_calls(calls))
}

// ==================== Mock tools ====================

type Behavior = Arc<dyn Fn(&Arguments) -> Result<ToolResult, ToolError> + Send + Sync>;

/// Mock tool that records calls and runs a configurable behavior
struct MockTool {
    definition: ToolDefinition,
    behavior: Behavior,
    delay: Option<Duration>,
    panics: bool,
    calls: AtomicUsize,
}

impl MockTool {
    fn new(name: &str, params: &[&str]) -> Self {
        let definition = params.iter().fold(
            ToolDefinition::new(name, format!("mock {}", name)),
            |def, p| def.with_parameter(ToolParameter::new(*p, *p, false)),
        );
        let tool_name = name.to_string();
        Self {
            definition,
            behavior: Arc::new(move |_| Ok(ToolResult::success(tool_name.clone(), "ok"))),
            delay: None,
            panics: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn required(mut self, param: &str) -> Self {
        for p in &mut self.definition.parameters {
            if p.name == param {
                p.required = true;
            }
        }
        self
    }

    fn behavior(
        mut self,
        f: impl Fn(&Arguments) -> Result<ToolResult, ToolError> + Send + Sync + 'static,
    ) -> Self {
        self.behavior = Arc::new(f);
        self
    }

    fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.definition.name
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext, args: &Arguments) -> Result<ToolResult, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = ctx.cancel.cancelled() => return Err(ToolError::cancelled()),
            }
        }
        if self.panics {
            panic!("tool exploded");
        }
        (self.behavior)(args)
    }
}

struct MockTools {
    tools: HashMap<String, Arc<MockTool>>,
}

impl ToolLookup for MockTools {
    fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(|t| Arc::clone(t) as Arc<dyn Tool>)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }
}

// ==================== Recording collaborators ====================

#[derive(Default)]
struct RecordingAudit {
    entries: Mutex<Vec<AuditEntry>>,
}

impl AuditLogger for RecordingAudit {
    fn log(&self, entry: AuditEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}

impl RecordingAudit {
    fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

/// Tracking handler that records callback names
#[derive(Default)]
struct RecordingHandler {
    events: Mutex<Vec<String>>,
}

impl RecordingHandler {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

impl ExecutionHandler for RecordingHandler {
    fn on_tool_start(&self, call: &ToolCall) {
        self.events.lock().unwrap().push(format!("start:{}", call.tool_name));
    }

    fn on_tool_end(&self, tool_name: &str, result: &ToolResult) {
        self.events
            .lock()
            .unwrap()
            .push(format!("end:{}:{}", tool_name, result.success));
    }

    fn on_tool_progress(&self, tool_name: &str, _elapsed: Duration) {
        self.events.lock().unwrap().push(format!("progress:{}", tool_name));
    }

    fn on_tool_approved(&self, tool_name: &str) {
        self.events.lock().unwrap().push(format!("approved:{}", tool_name));
    }

    fn on_tool_denied(&self, tool_name: &str, _reason: &str) {
        self.events.lock().unwrap().push(format!("denied:{}", tool_name));
    }

    fn on_warning(&self, tool_name: &str, _warning: &str) {
        self.events.lock().unwrap().push(format!("warning:{}", tool_name));
    }

    fn on_error(&self, message: &str) {
        self.events.lock().unwrap().push(format!("error:{}", message));
    }
}

/// Permission checker with a fixed answer that counts calls
struct FixedPermission {
    allow: bool,
    checks: AtomicUsize,
}

impl FixedPermission {
    fn new(allow: bool) -> Self {
        Self {
            allow,
            checks: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PermissionChecker for FixedPermission {
    async fn check(
        &self,
        _tool_name: &str,
        _args: &Arguments,
    ) -> Result<PermissionResponse, PermissionError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if self.allow {
            Ok(PermissionResponse::allow())
        } else {
            Ok(PermissionResponse::deny("user said no"))
        }
    }
}

struct MaskSecret;

impl SecretRedactor for MaskSecret {
    fn redact(&self, text: &str) -> String {
        text.replace("SECRET", "[REDACTED]")
    }
}

/// Compactor that records what it was given
#[derive(Default)]
struct RecordingCompactor {
    seen: Mutex<Vec<String>>,
}

impl ResultCompactor for RecordingCompactor {
    fn compact_for_type(&self, _tool_name: &str, mut result: ToolResult) -> ToolResult {
        self.seen.lock().unwrap().push(result.content.clone());
        result.content.truncate(8);
        result
    }
}

// ==================== Harness ====================

struct Harness {
    executor: Executor,
    llm: Arc<ScriptedLlm>,
    audit: Arc<RecordingAudit>,
    handler: Arc<RecordingHandler>,
    notifications: Arc<NotificationManager>,
}

struct HarnessBuilder {
    script: Vec<Scripted>,
    tools: Vec<Arc<MockTool>>,
    config: ExecutorConfig,
    permissions: Option<Arc<dyn PermissionChecker>>,
    redactor: Option<Arc<dyn SecretRedactor>>,
    compactor: Option<Arc<dyn ResultCompactor>>,
}

impl HarnessBuilder {
    fn new(script: Vec<Scripted>) -> Self {
        Self {
            script,
            tools: Vec::new(),
            config: ExecutorConfig::default(),
            permissions: None,
            redactor: None,
            compactor: None,
        }
    }

    fn tool(mut self, tool: Arc<MockTool>) -> Self {
        self.tools.push(tool);
        self
    }

    fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    fn permissions(mut self, checker: Arc<dyn PermissionChecker>) -> Self {
        self.permissions = Some(checker);
        self
    }

    fn redactor(mut self, redactor: Arc<dyn SecretRedactor>) -> Self {
        self.redactor = Some(redactor);
        self
    }

    fn compactor(mut self, compactor: Arc<dyn ResultCompactor>) -> Self {
        self.compactor = Some(compactor);
        self
    }

    fn build(self) -> Harness {
        let llm = Arc::new(ScriptedLlm::new(self.script));
        let tools = Arc::new(MockTools {
            tools: self
                .tools
                .into_iter()
                .map(|t| (t.definition.name.clone(), t))
                .collect(),
        });
        let audit = Arc::new(RecordingAudit::default());
        let handler = Arc::new(RecordingHandler::default());
        let notifications = Arc::new(NotificationManager::new(
            NotificationConfig::default().with_verbose(true),
        ));

        let mut builder = Executor::builder(llm.clone(), tools)
            .config(self.config)
            .audit(audit.clone())
            .handler(handler.clone())
            .notifications(notifications.clone());
        if let Some(p) = self.permissions {
            builder = builder.permissions(p);
        }
        if let Some(r) = self.redactor {
            builder = builder.redactor(r);
        }
        if let Some(c) = self.compactor {
            builder = builder.compactor(c);
        }

        Harness {
            executor: builder.build(),
            llm,
            audit,
            handler,
            notifications,
        }
    }
}

impl Harness {
    async fn run(&self, message: &str) -> (Result<ExecuteOutput, ExecutorError>, History) {
        let mut history = History::new();
        let result = self
            .executor
            .execute(&CancellationToken::new(), &mut history, message)
            .await;
        (result, history)
    }

    async fn call(&self, call: ToolCall) -> ToolResult {
        self.executor
            .pipeline
            .execute_tool(&CancellationToken::new(), &call)
            .await
    }

    async fn dispatch(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        dispatch_calls(&self.executor.pipeline, &CancellationToken::new(), calls).await
    }
}

fn read_tool() -> MockTool {
    MockTool::new("read", &["file_path"])
        .required("file_path")
        .behavior(|args| {
            let path = args.get("file_path").and_then(|v| v.as_str()).unwrap_or("");
            Ok(ToolResult::success("read", format!("contents of {}", path)))
        })
}

// ==================== Conversation loop ====================

#[tokio::test]
async fn text_reply_ends_loop() {
    let h = HarnessBuilder::new(vec![Scripted::Reply(
        LlmResponse::from_text("Hello!").with_usage(12, 3),
    )])
    .build();

    let (result, history) = h.run("hi").await;
    let output = result.unwrap();

    assert_eq!(output.final_text, "Hello!");
    assert_eq!(output.iterations, 1);
    assert!(!output.used_fallback);
    assert_eq!(output.usage.total(), 15);
    assert_eq!(history.len(), 2);
    assert_eq!(
        h.llm.requests(),
        vec![Request::Message {
            history_len: 0,
            message: "hi".into()
        }]
    );
}

#[tokio::test]
async fn tool_round_trip_builds_history() {
    let read = Arc::new(read_tool());
    let h = HarnessBuilder::new(vec![
        Scripted::Reply(
            LlmResponse::with_calls(vec![
                ToolCall::new("c1", "read").with_arg("file_path", "a.txt")
            ])
            .with_usage(10, 5),
        ),
        Scripted::Reply(LlmResponse::from_text("It says hi.").with_usage(20, 4)),
    ])
    .tool(read.clone())
    .build();

    let (result, history) = h.run("what is in a.txt?").await;
    let output = result.unwrap();

    assert_eq!(output.final_text, "It says hi.");
    assert_eq!(output.tools_used, vec!["read"]);
    assert_eq!(output.usage.input_tokens, 30);
    assert_eq!(read.call_count(), 1);

    let roles: Vec<Role> = history.turns().iter().map(|c| c.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Model, Role::Function, Role::Model]);

    match &h.llm.requests()[1] {
        Request::Functions {
            history_len,
            ids,
            responses,
        } => {
            assert_eq!(*history_len, 2);
            assert_eq!(ids, &vec!["c1".to_string()]);
            assert_eq!(responses[0]["content"], "contents of a.txt");
        }
        other => panic!("unexpected request {:?}", other),
    }
}

#[tokio::test]
async fn budget_exhaustion_uses_last_tool_fallback() {
    let grep = Arc::new(
        MockTool::new("grep", &["pattern"])
            .behavior(|_| Ok(ToolResult::success("grep", "src/lib.rs:1: TODO"))),
    );
    let h = HarnessBuilder::new(vec![
        calls(vec![ToolCall::new("c1", "read").with_arg("file_path", "a")]),
        text(""),
        calls(vec![ToolCall::new("c2", "grep").with_arg("pattern", "TODO")]),
        text("   "),
    ])
    .tool(Arc::new(read_tool()))
    .tool(grep)
    .config(ExecutorConfig::default().with_max_iterations(2))
    .build();

    let (result, _) = h.run("find todos").await;
    let output = result.unwrap();

    assert!(output.used_fallback);
    assert_eq!(output.iterations, 2);
    assert!(output.final_text.starts_with("I found these matches:"));
    assert!(output.final_text.ends_with("Tools used: read, grep"));
}

#[tokio::test]
async fn budget_exhaustion_without_tools_uses_fixed_text() {
    let h = HarnessBuilder::new(vec![text(""), text("")])
        .config(ExecutorConfig::default().with_max_iterations(2))
        .build();

    let (result, history) = h.run("?").await;
    assert_eq!(result.unwrap().final_text, NO_TOOLS_FALLBACK);
    // Empty replies are not recorded
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn llm_error_preserves_history() {
    let h = HarnessBuilder::new(vec![
        calls(vec![ToolCall::new("c1", "read").with_arg("file_path", "a")]),
        Scripted::Error("upstream 500".into()),
    ])
    .tool(Arc::new(read_tool()))
    .build();

    let (result, history) = h.run("read a").await;
    assert!(matches!(result, Err(ExecutorError::Llm(_))));
    assert_eq!(history.len(), 3);
    assert_eq!(history.last().unwrap().role, Role::Function);
    assert_eq!(h.handler.count("error:"), 1);
}

#[tokio::test]
async fn cancelled_before_start() {
    let h = HarnessBuilder::new(vec![text("never")]).build();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut history = History::new();
    let result = h.executor.execute(&cancel, &mut history, "hi").await;
    assert!(result.unwrap_err().is_cancelled());
    assert!(h.llm.requests().is_empty());
}

// ==================== Dispatch ====================

#[tokio::test(start_paused = true)]
async fn parallel_results_keep_request_order() {
    let slow = Arc::new(
        MockTool::new("slow", &[])
            .delay(Duration::from_millis(500))
            .behavior(|_| Ok(ToolResult::success("slow", "A"))),
    );
    let fast = Arc::new(
        MockTool::new("fast", &[]).behavior(|_| Ok(ToolResult::success("fast", "B"))),
    );
    let h = HarnessBuilder::new(vec![])
        .tool(slow)
        .tool(fast)
        .build();

    let results = h
        .dispatch(&[ToolCall::new("a", "slow"), ToolCall::new("b", "fast")])
        .await;

    let contents: Vec<&str> = results.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, vec!["A", "B"]);
    // fast finished first
    let ends: Vec<String> = h
        .handler
        .events()
        .into_iter()
        .filter(|e| e.starts_with("end:"))
        .collect();
    assert_eq!(ends, vec!["end:fast:true", "end:slow:true"]);
}

#[tokio::test]
async fn panic_is_isolated_to_one_call() {
    let boom = Arc::new(MockTool::new("boom", &[]).panicking());
    let h = HarnessBuilder::new(vec![])
        .tool(boom)
        .tool(Arc::new(read_tool()))
        .build();

    let results = h
        .dispatch(&[
            ToolCall::new("a", "boom"),
            ToolCall::new("b", "read").with_arg("file_path", "x"),
        ])
        .await;

    assert!(!results[0].success);
    assert!(results[0].error().unwrap().contains("tool panicked: tool exploded"));
    assert!(results[1].success);
}

#[tokio::test]
async fn single_panicking_call_is_isolated_too() {
    let h = HarnessBuilder::new(vec![])
        .tool(Arc::new(MockTool::new("boom", &[]).panicking()))
        .build();

    let results = h.dispatch(&[ToolCall::new("a", "boom")]).await;
    assert_eq!(results.len(), 1);
    assert!(!results[0].success);
}

#[tokio::test]
async fn cancelled_dispatch_skips_execution() {
    let read = Arc::new(read_tool());
    let h = HarnessBuilder::new(vec![]).tool(read.clone()).build();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let calls = [
        ToolCall::new("a", "read").with_arg("file_path", "x"),
        ToolCall::new("b", "read").with_arg("file_path", "y"),
    ];
    let results = dispatch_calls(&h.executor.pipeline, &cancel, &calls).await;

    assert!(results.iter().all(|r| r.error() == Some("cancelled")));
    assert_eq!(read.call_count(), 0);
}

// ==================== Pipeline ====================

#[tokio::test]
async fn breaker_short_circuits_after_five_failures() {
    let flaky = Arc::new(
        MockTool::new("read", &["file_path"])
            .behavior(|_| Ok(ToolResult::failure("read", "disk on fire"))),
    );
    let h = HarnessBuilder::new(vec![]).tool(flaky.clone()).build();
    let call = ToolCall::new("c", "read").with_arg("file_path", "a");

    for _ in 0..5 {
        assert!(!h.call(call.clone()).await.success);
    }
    assert_eq!(h.executor.circuit_state("read"), Some(CircuitState::Open));

    let rejected = h.call(call.clone()).await;
    assert_eq!(flaky.call_count(), 5);
    assert!(rejected
        .error()
        .unwrap()
        .starts_with("Circuit breaker for 'read' is open"));
    // One audit entry per call, including the rejected one
    assert_eq!(h.audit.entries().len(), 6);

    assert!(h.executor.reset_circuit("read"));
    assert_eq!(h.executor.circuit_state("read"), Some(CircuitState::Closed));
    assert!(!h.executor.reset_circuit("never-called"));
}

#[tokio::test]
async fn breaker_threshold_is_configurable() {
    let failing = Arc::new(
        MockTool::new("glob", &["pattern"]).behavior(|_| Err(ToolError::execution_failed("io"))),
    );
    let config = ExecutorConfig::default()
        .with_breaker(CircuitBreakerConfig::default().failure_threshold(2));
    let h = HarnessBuilder::new(vec![])
        .tool(failing)
        .config(config)
        .build();

    let call = ToolCall::new("c", "glob").with_arg("pattern", "*.rs");
    h.call(call.clone()).await;
    h.call(call).await;
    assert_eq!(h.executor.circuit_state("glob"), Some(CircuitState::Open));
    assert_eq!(h.executor.circuit_stats()[0].consecutive_failures, 2);
}

#[tokio::test]
async fn missing_file_counts_one_failure_and_is_audited() {
    let read = Arc::new(
        MockTool::new("read", &["file_path"])
            .required("file_path")
            .behavior(|_| Ok(ToolResult::failure("read", "not found"))),
    );
    let h = HarnessBuilder::new(vec![]).tool(read).build();

    let result = h
        .call(ToolCall::new("c1", "read").with_arg("file_path", "missing.txt"))
        .await;

    assert!(!result.success);
    assert_eq!(result.error(), Some("not found"));
    assert_eq!(h.executor.circuit_stats()[0].consecutive_failures, 1);

    let stats = h.notifications.stats();
    assert_eq!(stats.count(NotificationType::Error), 1);

    let entries = h.audit.entries();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
    assert_eq!(entries[0].call_id, "c1");
    assert_eq!(entries[0].error.as_deref(), Some("not found"));
    assert_eq!(entries[0].args[SAFETY_LEVEL_KEY], "safe");
    assert_eq!(entries[0].args[SAFETY_WARNINGS_KEY], serde_json::json!([]));
}

#[tokio::test]
async fn empty_bash_command_fails_validation() {
    let bash = Arc::new(MockTool::new("bash", &["command"]).required("command"));
    let h = HarnessBuilder::new(vec![]).tool(bash.clone()).build();

    let result = h
        .call(ToolCall::new("c1", "bash").with_arg("command", ""))
        .await;

    assert_eq!(bash.call_count(), 0);
    assert!(result.error().unwrap().starts_with("validation error:"));
    assert_eq!(h.audit.entries().len(), 1);
    assert_eq!(h.notifications.stats().count(NotificationType::Error), 1);
}

#[tokio::test]
async fn unknown_tool_is_an_error_result() {
    let h = HarnessBuilder::new(vec![]).build();
    let result = h.call(ToolCall::new("c1", "teleport")).await;
    assert_eq!(result.error(), Some("Unknown tool: teleport"));
    assert_eq!(h.handler.count("end:teleport:false"), 1);
}

#[tokio::test]
async fn batch_delete_blocked_before_permission_check() {
    let batch = Arc::new(MockTool::new("batch", &["operation", "pattern"]));
    let permission = Arc::new(FixedPermission::new(true));
    let h = HarnessBuilder::new(vec![])
        .tool(batch.clone())
        .permissions(permission.clone())
        .build();

    let result = h
        .call(
            ToolCall::new("c1", "batch")
                .with_arg("operation", "delete")
                .with_arg("pattern", "tmp/*.log"),
        )
        .await;

    assert!(result.error().unwrap().contains("requires explicit confirmation"));
    assert_eq!(permission.checks.load(Ordering::SeqCst), 0);
    assert_eq!(batch.call_count(), 0);
    assert_eq!(h.handler.count("denied:batch"), 1);

    // The denial is the only terminal notification
    let recent = h.notifications.get_recent(10);
    assert_eq!(
        recent
            .iter()
            .filter(|n| n.message == "Blocked batch")
            .count(),
        1
    );
    assert_eq!(h.notifications.stats().count(NotificationType::Error), 0);
    assert_eq!(h.audit.entries().len(), 1);
}

#[tokio::test]
async fn confirmed_batch_delete_reaches_permission_and_runs() {
    let batch = Arc::new(MockTool::new("batch", &["operation", "pattern"]));
    let permission = Arc::new(FixedPermission::new(true));
    let h = HarnessBuilder::new(vec![])
        .tool(batch.clone())
        .permissions(permission.clone())
        .config(ExecutorConfig::default().with_confirmed(true))
        .build();

    let result = h
        .call(
            ToolCall::new("c1", "batch")
                .with_arg("operation", "delete")
                .with_arg("pattern", "tmp/*.log"),
        )
        .await;

    assert!(result.success);
    assert_eq!(permission.checks.load(Ordering::SeqCst), 1);
    assert_eq!(batch.call_count(), 1);
    assert_eq!(h.handler.count("warning:batch"), 1);
    assert_eq!(h.handler.count("approved:batch"), 1);

    let entry = &h.audit.entries()[0];
    assert_eq!(entry.args[SAFETY_LEVEL_KEY], "dangerous");
    assert_eq!(entry.args[SAFETY_WARNINGS_KEY].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn permission_denial_stops_execution() {
    let bash = Arc::new(MockTool::new("bash", &["command"]).required("command"));
    let h = HarnessBuilder::new(vec![])
        .tool(bash.clone())
        .permissions(Arc::new(FixedPermission::new(false)))
        .build();

    let result = h
        .call(ToolCall::new("c1", "bash").with_arg("command", "ls"))
        .await;

    assert_eq!(result.error(), Some("permission denied: user said no"));
    assert_eq!(bash.call_count(), 0);
    assert_eq!(h.handler.count("denied:bash"), 1);
    assert!(result.execution_summary.is_some());
}

#[tokio::test]
async fn safe_tools_are_approved_silently() {
    let h = HarnessBuilder::new(vec![])
        .tool(Arc::new(read_tool()))
        .permissions(Arc::new(FixedPermission::new(true)))
        .build();

    let result = h
        .call(ToolCall::new("c1", "read").with_arg("file_path", "a"))
        .await;
    assert!(result.success);
    assert_eq!(h.handler.count("approved:"), 0);
}

#[tokio::test]
async fn safety_checks_can_be_disabled() {
    let bash = Arc::new(MockTool::new("bash", &["command"]).required("command"));
    let h = HarnessBuilder::new(vec![])
        .tool(bash.clone())
        .config(ExecutorConfig::default().with_safety_checks(false))
        .build();

    let result = h
        .call(ToolCall::new("c1", "bash").with_arg("command", "rm -rf /"))
        .await;
    assert!(result.success);
    assert_eq!(bash.call_count(), 1);
}

#[tokio::test]
async fn result_metadata_is_attached() {
    let h = HarnessBuilder::new(vec![])
        .tool(Arc::new(read_tool()))
        .build();

    let result = h
        .call(ToolCall::new("c1", "read").with_arg("file_path", "src/lib.rs"))
        .await;

    assert!(result.duration.is_some());
    assert_eq!(result.safety_level, Some(conductor_domain::SafetyLevel::Safe));
    assert_eq!(
        result.execution_summary.unwrap().describe(),
        "Read src/lib.rs"
    );
}

#[tokio::test]
async fn redaction_precedes_compaction_audit_and_notification() {
    let leaky = Arc::new(
        MockTool::new("bash", &["command"])
            .required("command")
            .behavior(|_| Ok(ToolResult::success("bash", "token=SECRET and more output"))),
    );
    let failing = Arc::new(
        MockTool::new("grep", &["pattern"])
            .behavior(|_| Ok(ToolResult::failure("grep", "auth SECRET rejected"))),
    );
    let compactor = Arc::new(RecordingCompactor::default());
    let h = HarnessBuilder::new(vec![])
        .tool(leaky)
        .tool(failing)
        .redactor(Arc::new(MaskSecret))
        .compactor(compactor.clone())
        .build();

    let ok = h
        .call(ToolCall::new("c1", "bash").with_arg("command", "env"))
        .await;
    assert_eq!(compactor.seen.lock().unwrap()[0], "token=[REDACTED] and more output");
    assert_eq!(ok.content, "token=[R");

    let failed = h
        .call(ToolCall::new("c2", "grep").with_arg("pattern", "x"))
        .await;
    assert_eq!(failed.error(), Some("auth [REDACTED] rejected"));
    // Failed results are not compacted
    assert_eq!(compactor.seen.lock().unwrap().len(), 1);

    for entry in h.audit.entries() {
        assert!(!entry.content.contains("SECRET"));
        assert!(!entry.error.unwrap_or_default().contains("SECRET"));
    }
    for n in h.notifications.get_recent(100) {
        assert!(!n.details.unwrap_or_default().contains("SECRET"));
    }
}

#[tokio::test(start_paused = true)]
async fn slow_tool_times_out_with_heartbeats() {
    let slow = Arc::new(MockTool::new("bash", &["command"]).delay(Duration::from_secs(30)));
    let config = ExecutorConfig::default()
        .with_tool_timeout(Duration::from_secs(12))
        .with_heartbeat_interval(Duration::from_secs(5));
    let h = HarnessBuilder::new(vec![])
        .tool(slow)
        .config(config)
        .build();

    let result = h
        .call(ToolCall::new("c1", "bash").with_arg("command", "sleep 30"))
        .await;

    assert!(!result.success);
    assert!(result.error().unwrap().contains("timed out"));
    assert_eq!(h.handler.count("progress:bash"), 2);
    assert_eq!(
        h.notifications.stats().count(NotificationType::Progress),
        2
    );
}

#[tokio::test(start_paused = true)]
async fn caller_cancellation_reaches_running_call() {
    let slow = Arc::new(MockTool::new("bash", &["command"]).delay(Duration::from_secs(30)));
    let h = HarnessBuilder::new(vec![]).tool(slow.clone()).build();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        trigger.cancel();
    });

    let started = tokio::time::Instant::now();
    let result = h
        .executor
        .pipeline
        .execute_tool(
            &cancel,
            &ToolCall::new("c1", "bash").with_arg("command", "sleep 30"),
        )
        .await;
    let elapsed = started.elapsed();

    assert_eq!(slow.call_count(), 1);
    assert!(!result.success);
    assert_eq!(result.error(), Some("cancelled"));
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(30), "ended after {:?}", elapsed);
    assert_eq!(h.handler.count("end:bash:false"), 1);
    assert_eq!(h.audit.entries().len(), 1);
    assert!(!h.audit.entries()[0].success);
}

#[tokio::test(start_paused = true)]
async fn caller_cancellation_reaches_parallel_calls() {
    let slow = Arc::new(MockTool::new("bash", &["command"]).delay(Duration::from_secs(30)));
    let h = HarnessBuilder::new(vec![]).tool(slow.clone()).build();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let calls = [
        ToolCall::new("a", "bash").with_arg("command", "sleep 30"),
        ToolCall::new("b", "bash").with_arg("command", "sleep 30"),
    ];
    let started = tokio::time::Instant::now();
    let results = dispatch_calls(&h.executor.pipeline, &cancel, &calls).await;

    assert!(started.elapsed() < Duration::from_secs(30));
    assert_eq!(slow.call_count(), 2);
    assert!(results.iter().all(|r| r.error() == Some("cancelled")));
}

#[tokio::test]
async fn tool_error_becomes_failure_result() {
    let failing = Arc::new(MockTool::new("glob", &["pattern"]).behavior(|_| {
        Err(ToolError::invalid_argument("bad glob").with_details("unclosed ["))
    }));
    let h = HarnessBuilder::new(vec![]).tool(failing).build();

    let result = h
        .call(ToolCall::new("c1", "glob").with_arg("pattern", "[a"))
        .await;
    assert_eq!(result.error(), Some("bad glob (unclosed [)"));
    assert_eq!(result.tool_name, "glob");
}
