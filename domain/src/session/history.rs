//! Conversation history in the function-calling shape.
//!
//! A history is an ordered list of [`Content`] turns. Each turn has a
//! [`Role`] and one or more [`Part`]s: plain text, a function call issued by
//! the model, or the response the host sends back for a call.

use crate::core::error::DomainError;
use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    Function,
}

/// Result of one tool call as it is sent back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Id of the call this answers
    pub id: String,
    pub name: String,
    pub response: serde_json::Value,
}

/// A single piece of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Text(String),
    FunctionCall(ToolCall),
    FunctionResponse(FunctionResponse),
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// A model turn carrying optional text followed by its function calls.
    pub fn model(text: &str, calls: &[ToolCall]) -> Self {
        let mut parts = Vec::with_capacity(calls.len() + 1);
        if !text.is_empty() {
            parts.push(Part::Text(text.to_string()));
        }
        parts.extend(calls.iter().cloned().map(Part::FunctionCall));
        Self {
            role: Role::Model,
            parts,
        }
    }

    pub fn function_responses(responses: Vec<FunctionResponse>) -> Self {
        Self {
            role: Role::Function,
            parts: responses.into_iter().map(Part::FunctionResponse).collect(),
        }
    }

    /// Concatenated text parts, or `None` when the turn has no text.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    pub fn function_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.parts.iter().filter_map(|p| match p {
            Part::FunctionCall(call) => Some(call),
            _ => None,
        })
    }
}

/// Ordered conversation turns, owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    turns: Vec<Content>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, content: Content) {
        self.turns.push(content);
    }

    pub fn push_user_text(&mut self, text: impl Into<String>) {
        self.push(Content::user_text(text));
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Exchanges so far, counting a user/model pair as one.
    pub fn turn_count(&self) -> usize {
        self.turns.len() / 2
    }

    pub fn turns(&self) -> &[Content] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Content> {
        self.turns.last()
    }

    /// Separate the most recent user text message from the rest.
    ///
    /// Returns the history without that turn plus its text, which is the
    /// shape `send_message_with_history` expects.
    pub fn split_last_user_message(&self) -> Result<(Vec<Content>, String), DomainError> {
        let index = self
            .turns
            .iter()
            .rposition(|c| c.role == Role::User && c.text().is_some())
            .ok_or(DomainError::NoUserMessage)?;

        let message = self.turns[index].text().unwrap_or_default();
        let rest = self
            .turns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, c)| c.clone())
            .collect();
        Ok((rest, message))
    }
}

impl From<Vec<Content>> for History {
    fn from(turns: Vec<Content>) -> Self {
        Self { turns }
    }
}
