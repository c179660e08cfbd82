//! Chat backend seam.
//!
//! The core talks to exactly one remote chat endpoint through this trait;
//! the HTTP implementation lives in `redpill-backend`, tests use mocks.

use crate::error::Result;
use crate::session::{Message, Sender};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry of conversation context sent with a chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// `"user"` or `"ai"`.
    pub role: String,
    pub content: String,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> Self {
        Self {
            role: match message.sender {
                Sender::User => "user".to_string(),
                Sender::Ai => "ai".to_string(),
            },
            content: message.content.clone(),
        }
    }
}

/// Request body for the chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub project_id: String,
    pub project_type: String,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
    /// Extra directories the backend may use as retrieval context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_directories: Vec<String>,
}

/// Reply from the chat endpoint.
///
/// `success` is optional on the wire; an explicit `false` counts as a
/// backend failure even with a 2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChatReply {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
}

impl ChatReply {
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(true)
    }
}

/// The remote research backend's chat surface.
///
/// No retries anywhere: a failed call is surfaced once and callers fall
/// back to a substitute value (apology message, fallback plan).
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest {
            message: "What changed in fintech this week?".to_string(),
            project_id: "acme".to_string(),
            project_type: "company".to_string(),
            conversation_history: vec![HistoryEntry {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            context_directories: Vec::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["project_id"], "acme");
        assert_eq!(value["conversation_history"][0]["role"], "user");
        // Empty context directories stay off the wire
        assert!(value.get("context_directories").is_none());
    }

    #[test]
    fn test_reply_success_defaults_true() {
        let reply: ChatReply = serde_json::from_str(r#"{"content": "ok"}"#).unwrap();
        assert!(reply.is_success());

        let reply: ChatReply =
            serde_json::from_str(r#"{"success": false, "content": ""}"#).unwrap();
        assert!(!reply.is_success());
    }
}
