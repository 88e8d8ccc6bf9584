//! Error types for the chat assistant.

/// Errors from the chat session and the fallback assistant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("assistant is still typing")]
    Busy,
    #[error("chat is closed")]
    Closed,
    #[error("assistant unavailable: {0}")]
    AssistantUnavailable(String),
    #[error("assistant configuration error: {0}")]
    Configuration(String),
}
