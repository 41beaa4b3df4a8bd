//! Collapsed model response.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// One model reply after its stream has been fully consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub function_calls: Vec<ToolCall>,
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

impl LlmResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            function_calls: calls,
            ..Default::default()
        }
    }

    pub fn with_usage(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
        self
    }

    pub fn has_function_calls(&self) -> bool {
        !self.function_calls.is_empty()
    }

    /// Usage reported by the provider, if any.
    pub fn usage(&self) -> Option<TokenUsage> {
        if self.input_tokens == 0 && self.output_tokens == 0 {
            None
        } else {
            Some(TokenUsage {
                input_tokens: self.input_tokens,
                output_tokens: self.output_tokens,
            })
        }
    }
}

/// Accumulated token counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }

    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
