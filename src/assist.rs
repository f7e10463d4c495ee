//! Interface to the remote text-generation collaborator.
//!
//! The store treats the AI service as an opaque request/response
//! collaborator: given a prompt (event summaries) or a conversation
//! history plus context (the chatbot), it returns generated text. Calls
//! are fallible and never retried here; callers surface a fallback
//! message and let the user re-trigger manually.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a text-service call.
#[derive(Debug, Error)]
pub enum AssistError {
    #[error("Text service error: {0}")]
    Service(String),
}

/// Speaker of one conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of chatbot conversation history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// The collaborator seam. Implementations live in the embedding shell
/// (HTTP client, wasm fetch adapter, test double).
pub trait TextService {
    /// Plain-text completion for a single prompt.
    fn summarize(&self, prompt: &str) -> Result<String, AssistError>;

    /// Chat reply given prior turns, the new user message, and a
    /// context string (see `AppStore::chat_context`).
    fn chat(&self, history: &[ChatTurn], message: &str, context: &str)
        -> Result<String, AssistError>;
}
