//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
///
/// Serialized lowercase (`"user"` / `"ai"`) for compatibility with the
/// stored history format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// Discriminates special assistant messages from plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Ordinary chat text.
    Text,
    /// A proposed research plan awaiting user approval.
    PlanApproval,
    /// A completed research section mirrored into the conversation.
    ResearchSection,
    /// Transient status notice (e.g. research completion).
    Status,
}

/// A single message in a session's conversation history.
///
/// Messages are append-only: once appended they are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Message {
    /// Builds a plain-text message from the given sender.
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
            kind: Some(MessageKind::Text),
            metadata: None,
        }
    }

    /// Builds an assistant message with an explicit kind.
    pub fn assistant(content: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::new(Sender::Ai, content)
        }
    }
}
