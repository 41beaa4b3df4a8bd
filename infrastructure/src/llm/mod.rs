//! LLM client adapters.
//!
//! The only transport shipped here is an offline replay of scripted model
//! turns; network transports plug in through the same
//! [`LlmClient`](conductor_application::LlmClient) port.

mod scripted;

pub use scripted::{ScriptError, ScriptTurn, ScriptedConversation, ScriptedLlmClient};
