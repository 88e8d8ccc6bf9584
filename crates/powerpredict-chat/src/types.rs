//! Chat data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry in the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub is_bot: bool,
    pub timestamp: DateTime<Utc>,
    /// Follow-up chips shown under a bot message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ChatMessage {
    /// A message typed or clicked by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_bot: false,
            timestamp: Utc::now(),
            suggestions: None,
        }
    }

    /// A message from the assistant, optionally with follow-up chips.
    pub fn bot(text: impl Into<String>, suggestions: Option<Vec<String>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_bot: true,
            timestamp: Utc::now(),
            suggestions,
        }
    }
}

/// Which rule produced an advisory response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    /// Personalized answer built from the current bill.
    Bill,
    /// Canned answer from a knowledge base topic.
    Topic,
    /// Fallback when nothing matched.
    Default,
}

/// Text and follow-up suggestions returned by the advisory engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub text: String,
    pub suggestions: Vec<String>,
    pub source: ResponseSource,
    /// Name of the matched topic when `source` is `Topic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}
