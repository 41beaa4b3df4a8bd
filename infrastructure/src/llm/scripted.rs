//! Replays model turns from a JSON script.
//!
//! ```json
//! {
//!   "message": "What does main.rs do?",
//!   "turns": [
//!     { "function_calls": [{ "id": "c1", "name": "read", "args": { "file_path": "src/main.rs" } }] },
//!     { "text": "It parses the CLI.", "input_tokens": 120, "output_tokens": 8 }
//!   ]
//! }
//! ```
//!
//! Each request to the client pops the next turn, whether it is a new user
//! message or a function-response turn. A turn of the form
//! `{ "error": "..." }` fails that request.

use async_trait::async_trait;
use conductor_application::ports::llm_client::{LlmClient, LlmError, ResponseStream};
use conductor_domain::{Content, FunctionResponse, LlmResponse};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Could not read script {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One scripted model reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptTurn {
    Error { error: String },
    Reply(LlmResponse),
}

/// A full script: the opening message and the model's turns.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScriptedConversation {
    #[serde(default)]
    pub message: Option<String>,
    pub turns: Vec<ScriptTurn>,
}

impl ScriptedConversation {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// [`LlmClient`] that answers from a fixed list of turns.
pub struct ScriptedLlmClient {
    turns: Mutex<VecDeque<ScriptTurn>>,
}

impl ScriptedLlmClient {
    pub fn new(turns: impl IntoIterator<Item = ScriptTurn>) -> Self {
        Self {
            turns: Mutex::new(turns.into_iter().collect()),
        }
    }

    pub fn from_conversation(conversation: ScriptedConversation) -> Self {
        Self::new(conversation.turns)
    }

    /// Turns not yet consumed
    pub fn remaining(&self) -> usize {
        self.turns.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn next_turn(&self, cancel: &CancellationToken) -> Result<ResponseStream, LlmError> {
        if cancel.is_cancelled() {
            return Err(LlmError::Cancelled);
        }
        let turn = self
            .turns
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match turn {
            Some(ScriptTurn::Reply(response)) => {
                debug!(
                    calls = response.function_calls.len(),
                    text_len = response.text.len(),
                    "Replaying scripted turn"
                );
                Ok(ResponseStream::from_response(response))
            }
            Some(ScriptTurn::Error { error }) => Err(LlmError::RequestFailed(error)),
            None => Err(LlmError::RequestFailed("script exhausted".to_string())),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn send_message_with_history(
        &self,
        cancel: &CancellationToken,
        _history: &[Content],
        _message: &str,
    ) -> Result<ResponseStream, LlmError> {
        self.next_turn(cancel)
    }

    async fn send_function_response(
        &self,
        cancel: &CancellationToken,
        _history: &[Content],
        _responses: &[FunctionResponse],
    ) -> Result<ResponseStream, LlmError> {
        self.next_turn(cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "message": "read it",
        "turns": [
            { "function_calls": [{ "id": "c1", "name": "read", "args": { "file_path": "a.txt" } }] },
            { "error": "rate limited" },
            { "text": "done", "input_tokens": 3, "output_tokens": 1 }
        ]
    }"#;

    #[test]
    fn test_parse_script() {
        let script = ScriptedConversation::from_json(SCRIPT).unwrap();
        assert_eq!(script.message.as_deref(), Some("read it"));
        assert_eq!(script.turns.len(), 3);

        match &script.turns[0] {
            ScriptTurn::Reply(r) => {
                assert_eq!(r.function_calls[0].tool_name, "read");
                assert_eq!(r.function_calls[0].get_string("file_path"), Some("a.txt"));
            }
            other => panic!("unexpected turn {:?}", other),
        }
        assert_eq!(
            script.turns[1],
            ScriptTurn::Error {
                error: "rate limited".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_missing_turns() {
        assert!(matches!(
            ScriptedConversation::from_json(r#"{"message": "hi"}"#),
            Err(ScriptError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = ScriptedConversation::from_path(Path::new("/nonexistent/script.json"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/script.json"));
    }

    #[tokio::test]
    async fn test_replays_in_order() {
        let client =
            ScriptedLlmClient::from_conversation(ScriptedConversation::from_json(SCRIPT).unwrap());
        let cancel = CancellationToken::new();

        let first = client
            .send_message_with_history(&cancel, &[], "read it")
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        assert!(first.has_function_calls());

        let second = client.send_function_response(&cancel, &[], &[]).await;
        assert!(matches!(second, Err(LlmError::RequestFailed(ref e)) if e == "rate limited"));

        let third = client
            .send_function_response(&cancel, &[], &[])
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        assert_eq!(third.text, "done");
        assert_eq!(third.input_tokens, 3);

        assert_eq!(client.remaining(), 0);
        assert!(client.send_function_response(&cancel, &[], &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_cancelled_request() {
        let client = ScriptedLlmClient::new(vec![ScriptTurn::Reply(LlmResponse::from_text("x"))]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = client.send_message_with_history(&cancel, &[], "hi").await;
        assert!(matches!(result, Err(LlmError::Cancelled)));
        assert_eq!(client.remaining(), 1);
    }
}
