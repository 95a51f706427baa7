//! LLM request/response types

use serde::{Deserialize, Serialize};

/// A single completion request
///
/// Each request is independent; no conversation state is kept between calls.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt prepended as the first message
    pub system_prompt: String,

    /// Conversation messages in order
    pub messages: Vec<Message>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Ask the server to constrain output to a JSON object
    pub json_mode: bool,
}

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FinishReason {
    /// Natural end of the reply
    #[default]
    Stop,
    /// Hit the max_tokens cap; the reply is likely truncated
    Length,
    /// Anything else the server reported
    Other(String),
}

impl FinishReason {
    pub fn from_api(reason: Option<&str>) -> Self {
        match reason {
            Some("stop") | None => Self::Stop,
            Some("length") => Self::Length,
            Some(other) => Self::Other(other.to_string()),
        }
    }
}

/// Token accounting reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Result of a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Reply text, if the server produced any
    pub content: Option<String>,

    /// Why generation stopped
    pub finish_reason: FinishReason,

    /// Token counts, zeroed when the server omits them
    pub usage: TokenUsage,
}
