//! Dispatch of the tool calls in one model turn.
//!
//! A single call runs inline. Two or more run concurrently, one task per
//! call, and results are placed back at each call's original index. A panic
//! inside a call is caught at the task boundary and becomes an error result
//! for that call only. The panicking thread's backtrace is logged with it.

use super::pipeline::ToolPipeline;
use conductor_domain::{ToolCall, ToolResult};
use futures::FutureExt;
use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Once};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Execute `calls` and return their results in request order.
pub(crate) async fn dispatch_calls(
    pipeline: &Arc<ToolPipeline>,
    cancel: &CancellationToken,
    calls: &[ToolCall],
) -> Vec<ToolResult> {
    match calls {
        [] => Vec::new(),
        [call] => vec![run_isolated(Arc::clone(pipeline), cancel.clone(), call.clone()).await],
        _ => dispatch_parallel(pipeline, cancel, calls).await,
    }
}

async fn dispatch_parallel(
    pipeline: &Arc<ToolPipeline>,
    cancel: &CancellationToken,
    calls: &[ToolCall],
) -> Vec<ToolResult> {
    let mut join_set = JoinSet::new();
    for (index, call) in calls.iter().enumerate() {
        let pipeline = Arc::clone(pipeline);
        let cancel = cancel.clone();
        let call = call.clone();
        join_set.spawn(async move { (index, run_isolated(pipeline, cancel, call).await) });
    }

    let mut slots: Vec<Option<ToolResult>> = vec![None; calls.len()];
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) if e.is_panic() => {
                tracing::error!("Tool dispatch task panicked: {}", e);
            }
            Err(e) => {
                tracing::error!("Tool dispatch task cancelled: {}", e);
            }
        }
    }

    // Fill slots of tasks that never reported back
    slots
        .into_iter()
        .zip(calls)
        .map(|(slot, call)| {
            slot.unwrap_or_else(|| {
                tracing::error!(tool = %call.tool_name, call_id = %call.id, "Filling failed task slot with error");
                ToolResult::failure(&call.tool_name, "task failed during execution")
            })
        })
        .collect()
}

thread_local! {
    static PANIC_BACKTRACE: RefCell<Option<Backtrace>> = const { RefCell::new(None) };
}

static BACKTRACE_HOOK: Once = Once::new();

/// Chain a panic hook that stores the backtrace on the panicking thread.
///
/// `catch_unwind` returns on that same thread, so the catch site can pick
/// the backtrace up right after the unwind.
fn install_backtrace_hook() {
    BACKTRACE_HOOK.call_once(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            PANIC_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(Backtrace::force_capture()));
            original_hook(info);
        }));
    });
}

fn take_panic_backtrace() -> Option<Backtrace> {
    PANIC_BACKTRACE.with(|slot| slot.borrow_mut().take())
}

/// Run one call with a cancellation pre-check and panic isolation.
async fn run_isolated(
    pipeline: Arc<ToolPipeline>,
    cancel: CancellationToken,
    call: ToolCall,
) -> ToolResult {
    if cancel.is_cancelled() {
        return ToolResult::failure(&call.tool_name, "cancelled");
    }

    install_backtrace_hook();
    match AssertUnwindSafe(pipeline.execute_tool(&cancel, &call))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            let backtrace = take_panic_backtrace()
                .map(|bt| bt.to_string())
                .unwrap_or_else(|| "unavailable".to_string());
            tracing::error!(
                tool = %call.tool_name,
                call_id = %call.id,
                panic = %message,
                backtrace = %backtrace,
                "Tool call panicked"
            );
            ToolResult::failure(&call.tool_name, format!("tool panicked: {}", message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_hook_keeps_backtrace_for_catch_site() {
        install_backtrace_hook();
        let _ = take_panic_backtrace();

        let caught = std::panic::catch_unwind(|| panic!("boom"));
        assert!(caught.is_err());

        let backtrace = take_panic_backtrace().expect("backtrace recorded");
        assert!(!backtrace.to_string().is_empty());
        // Taken once
        assert!(take_panic_backtrace().is_none());
    }

    #[test]
    fn panic_message_from_payloads() {
        let static_str: Box<dyn Any + Send> = Box::new("static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn Any + Send> = Box::new(42_u8);

        assert_eq!(panic_message(static_str.as_ref()), "static");
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
