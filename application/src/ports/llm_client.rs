//! LLM client port
//!
//! Defines the interface for talking to a function-calling model. The
//! transport is an infrastructure concern; the executor only sees
//! [`ResponseStream`]s.

use async_trait::async_trait;
use conductor_domain::{Content, FunctionResponse, LlmResponse, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Errors that can occur while talking to the model
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Transport closed")]
    TransportClosed,
}

/// Handle for receiving streaming events from the model.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct ResponseStream {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl ResponseStream {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// A stream that replays an already complete response.
    pub fn from_response(response: LlmResponse) -> Self {
        let mut events = Vec::new();
        if !response.text.is_empty() {
            events.push(StreamEvent::TextDelta(response.text));
        }
        events.extend(response.function_calls.into_iter().map(StreamEvent::FunctionCall));
        if response.input_tokens > 0 || response.output_tokens > 0 {
            events.push(StreamEvent::Usage {
                input_tokens: response.input_tokens,
                output_tokens: response.output_tokens,
            });
        }
        events.push(StreamEvent::Completed);

        let (tx, rx) = mpsc::channel(events.len());
        for event in events {
            // Capacity matches the event count
            let _ = tx.try_send(event);
        }
        Self::new(rx)
    }

    /// Consume the stream into a single [`LlmResponse`].
    pub async fn collect(self) -> Result<LlmResponse, LlmError> {
        self.collect_with(|_| {}).await
    }

    /// Consume the stream, calling `on_text` for each text chunk.
    pub async fn collect_with(
        mut self,
        mut on_text: impl FnMut(&str) + Send,
    ) -> Result<LlmResponse, LlmError> {
        let mut response = LlmResponse::default();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::TextDelta(chunk) => {
                    on_text(&chunk);
                    response.text.push_str(&chunk);
                }
                StreamEvent::FunctionCall(call) => response.function_calls.push(call),
                StreamEvent::Usage {
                    input_tokens,
                    output_tokens,
                } => {
                    response.input_tokens += input_tokens;
                    response.output_tokens += output_tokens;
                }
                StreamEvent::Error(e) => return Err(LlmError::StreamError(e)),
                StreamEvent::Completed => break,
            }
        }
        // Channel closed without Completed: return what we have
        Ok(response)
    }
}

/// Function-calling model client.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a user message on top of `history`.
    async fn send_message_with_history(
        &self,
        cancel: &CancellationToken,
        history: &[Content],
        message: &str,
    ) -> Result<ResponseStream, LlmError>;

    /// Send the results of the model's function calls.
    ///
    /// `history` is the conversation before the function-response turn.
    async fn send_function_response(
        &self,
        cancel: &CancellationToken,
        history: &[Content],
        responses: &[FunctionResponse],
    ) -> Result<ResponseStream, LlmError>;
}
