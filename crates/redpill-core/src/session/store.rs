//! Typed session persistence over the key-value seam.
//!
//! Each project owns one stored document: a JSON array of sessions under
//! `chat-history-<project_id>`, sorted by `last_activity` descending and
//! capped at a configured number of entries (oldest evicted first).

use super::model::Session;
use crate::config::DEFAULT_SESSION_CAP;
use crate::error::{RedpillError, Result};
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Reads and writes per-project session lists.
///
/// Reads are lenient: a missing or unparsable document yields an empty
/// list (with a warning), never an error. Writes follow save-after-mutate;
/// concurrent writers are last-write-wins.
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
    cap: usize,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            cap: DEFAULT_SESSION_CAP,
        }
    }

    /// Overrides the retained-session cap (defaults to 20).
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    /// Returns the project's sessions, most recent first.
    ///
    /// Invalid stored JSON is logged and treated as an empty history.
    pub async fn history(&self, project_id: &str) -> Vec<Session> {
        let key = history_key(project_id);
        let raw = match self.kv.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to read session history");
                return Vec::new();
            }
        };

        let mut sessions: Vec<Session> = match serde_json::from_str(&raw) {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "stored session history is not valid JSON");
                return Vec::new();
            }
        };

        sessions.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        sessions
    }

    /// Upserts `session` into its project's list, evicting the oldest
    /// entries beyond the cap, and writes the list back.
    pub async fn save(&self, session: &Session) -> Result<()> {
        let mut sessions = self.history(&session.project_id).await;
        sessions.retain(|s| s.id != session.id);
        sessions.push(session.clone());

        // Most recent first; eviction drops from the tail.
        sessions.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        sessions.truncate(self.cap);

        let raw = serde_json::to_string(&sessions)?;
        self.kv
            .set(&history_key(&session.project_id), &raw)
            .await
            .map_err(|e| RedpillError::data_access(e.to_string()))?;
        Ok(())
    }

    /// Looks up one session by id within a project's stored list.
    pub async fn find(&self, project_id: &str, session_id: &str) -> Option<Session> {
        self.history(project_id)
            .await
            .into_iter()
            .find(|s| s.id == session_id)
    }
}

fn history_key(project_id: &str) -> String {
    format!("chat-history-{}", project_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::{Message, Sender};
    use crate::session::model::{OpenOptions, Session};
    use crate::storage::MemoryKeyValueStore;

    fn test_session(project_id: &str) -> Session {
        Session::open(OpenOptions {
            project_id: project_id.to_string(),
            project_type: "company".to_string(),
            project_name: "Acme Robotics".to_string(),
        })
    }

    #[tokio::test]
    async fn test_save_and_reload_roundtrip() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = SessionStore::new(kv);

        let mut session = test_session("acme");
        session.push(Message::new(Sender::User, "hello"));
        session.push(Message::new(Sender::Ai, "hi there"));
        store.save(&session).await.unwrap();

        let loaded = store.find("acme", &session.id).await.unwrap();
        assert_eq!(loaded.messages.len(), session.messages.len());
        assert_eq!(loaded.last_activity, session.last_activity);
    }

    #[tokio::test]
    async fn test_invalid_json_yields_empty_history() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.seed("chat-history-acme", "{not json!");
        let store = SessionStore::new(kv);

        assert!(store.history("acme").await.is_empty());
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = SessionStore::new(kv);

        let mut ids = Vec::new();
        for _ in 0..21 {
            let mut session = test_session("acme");
            // Distinct, strictly increasing timestamps
            session.push(Message::new(Sender::User, "ping"));
            store.save(&session).await.unwrap();
            ids.push(session.id);
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let history = store.history("acme").await;
        assert_eq!(history.len(), 20);
        // The first saved (oldest) session was evicted; the rest remain.
        assert!(!history.iter().any(|s| s.id == ids[0]));
        for id in &ids[1..] {
            assert!(history.iter().any(|s| s.id == *id));
        }
    }

    #[tokio::test]
    async fn test_history_sorted_most_recent_first() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = SessionStore::new(kv);

        let old = test_session("acme");
        store.save(&old).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let recent = test_session("acme");
        store.save(&recent).await.unwrap();

        let history = store.history("acme").await;
        assert_eq!(history[0].id, recent.id);
        assert_eq!(history[1].id, old.id);
    }

    #[tokio::test]
    async fn test_projects_are_isolated() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = SessionStore::new(kv);

        store.save(&test_session("acme")).await.unwrap();
        store.save(&test_session("globex")).await.unwrap();

        assert_eq!(store.history("acme").await.len(), 1);
        assert_eq!(store.history("globex").await.len(), 1);
    }
}
