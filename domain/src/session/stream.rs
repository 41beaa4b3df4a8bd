//! Streaming events for LLM communication.
//!
//! [`StreamEvent`] represents individual events in a streaming model
//! response. The application layer folds a stream of these into an
//! [`LlmResponse`](super::response::LlmResponse).

use crate::tool::entities::ToolCall;

/// An event in a streaming LLM response.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A text chunk from the model.
    TextDelta(String),
    /// A complete function call.
    FunctionCall(ToolCall),
    /// Token usage reported by the provider.
    Usage { input_tokens: u64, output_tokens: u64 },
    /// An error that occurred during streaming.
    Error(String),
    /// The stream finished normally.
    Completed,
}

impl StreamEvent {
    /// Returns the text content if this is a `TextDelta` event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::TextDelta(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed | StreamEvent::Error(_))
    }
}
