//! Pluggable chat-completion backends.
//!
//! The trait is object safe so the router can hold `Box<dyn Completion>`
//! and swap a live backend for a mock in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod openai;

pub use openai::OpenAiCompletion;

/// Speaker role in a chat transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of conversation, as sent to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion backend error: {0}")]
    Upstream(String),
    #[error("completion request timed out")]
    Timeout,
}

/// A chat-completion backend.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Short human-readable backend name, for logs.
    fn name(&self) -> &str;

    /// Produce a reply for the given transcript.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, CompletionError>;
}
