//! Session domain model.
//!
//! This module contains the core Session entity that represents one
//! conversation thread tied to a portfolio project.

use super::message::Message;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One conversation thread scoped to a project.
///
/// A session contains:
/// - The owning project (id, type, display name)
/// - The append-only conversation history
/// - Whether this is the currently active thread
/// - The last-activity timestamp, refreshed on every mutation
///
/// Sessions are persisted as a JSON array under the per-project key
/// `chat-history-<project_id>`; field names serialize camelCase to stay
/// compatible with that stored format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier (`<epoch_millis>-<random suffix>`).
    pub id: String,
    pub project_id: String,
    pub project_type: String,
    pub project_name: String,
    pub messages: Vec<Message>,
    pub is_active: bool,
    pub last_activity: DateTime<Utc>,
}

/// Parameters for opening a new session.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    pub project_id: String,
    pub project_type: String,
    pub project_name: String,
}

impl Session {
    /// Creates a fresh, active session for the given project.
    pub fn open(options: OpenOptions) -> Self {
        Self {
            id: new_session_id(),
            project_id: options.project_id,
            project_type: options.project_type,
            project_name: options.project_name,
            messages: Vec::new(),
            is_active: true,
            last_activity: Utc::now(),
        }
    }

    /// Appends a message and refreshes `last_activity`.
    ///
    /// This is the only mutation path for the history, keeping the
    /// monotonic-refresh invariant in one place.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.last_activity = Utc::now();
    }

    /// Returns up to the `window` most recent messages, oldest first.
    pub fn trailing(&self, window: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }

    /// The most recent assistant message, if any.
    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == super::message::Sender::Ai)
    }
}

/// Session identity: millisecond timestamp plus a short random suffix.
fn new_session_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(rand::distributions::Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{}-{}", millis, suffix.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::Sender;

    #[test]
    fn test_open_is_active_and_empty() {
        let session = Session::open(OpenOptions {
            project_id: "acme".to_string(),
            project_type: "company".to_string(),
            project_name: "Acme Robotics".to_string(),
        });
        assert!(session.is_active);
        assert!(session.messages.is_empty());
        assert!(session.id.contains('-'));
    }

    #[test]
    fn test_push_refreshes_last_activity() {
        let mut session = Session::open(OpenOptions::default());
        let before = session.last_activity;
        session.push(Message::new(Sender::User, "hello"));
        assert!(session.last_activity >= before);
        assert_eq!(session.messages.len(), 1);
    }

    #[test]
    fn test_trailing_window() {
        let mut session = Session::open(OpenOptions::default());
        for i in 0..15 {
            session.push(Message::new(Sender::User, format!("m{}", i)));
        }
        let trailing = session.trailing(10);
        assert_eq!(trailing.len(), 10);
        assert_eq!(trailing[0].content, "m5");
        assert_eq!(trailing[9].content, "m14");
    }

    #[test]
    fn test_unique_ids() {
        let a = Session::open(OpenOptions::default());
        let b = Session::open(OpenOptions::default());
        assert_ne!(a.id, b.id);
    }
}
