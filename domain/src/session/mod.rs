//! Conversation state exchanged with the model.

pub mod history;
pub mod response;
pub mod stream;

pub use history::{Content, FunctionResponse, History, Part, Role};
pub use response::{LlmResponse, TokenUsage};
pub use stream::StreamEvent;
