//! Investment memos.
//!
//! Memos are saved, user-facing write-ups derived from a session or a
//! research section. They live under `memos-<project_id>` with a lifecycle
//! independent of sessions.

use crate::error::{RedpillError, Result};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: String,
    pub title: String,
    pub content: String,
    /// The session this memo was derived from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    pub date: DateTime<Utc>,
    pub author: String,
    pub project_id: String,
}

impl Memo {
    /// Builds a memo; the title defaults to the first line of the content.
    pub fn new(
        project_id: impl Into<String>,
        content: impl Into<String>,
        title: Option<String>,
        chat_id: Option<String>,
    ) -> Self {
        let content = content.into();
        let title = title.unwrap_or_else(|| {
            content
                .lines()
                .next()
                .unwrap_or("Untitled memo")
                .chars()
                .take(80)
                .collect()
        });
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            content,
            chat_id,
            date: Utc::now(),
            author: "redpill".to_string(),
            project_id: project_id.into(),
        }
    }
}

/// Reads and appends per-project memo lists over the key-value seam.
///
/// Same lenient-read policy as the session store: unparsable stored data
/// is logged and treated as empty.
pub struct MemoStore {
    kv: Arc<dyn KeyValueStore>,
}

impl MemoStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Returns the project's memos, most recent first.
    pub async fn list(&self, project_id: &str) -> Vec<Memo> {
        let key = memo_key(project_id);
        let raw = match self.kv.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to read memos");
                return Vec::new();
            }
        };

        let mut memos: Vec<Memo> = match serde_json::from_str(&raw) {
            Ok(memos) => memos,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "stored memo list is not valid JSON");
                return Vec::new();
            }
        };
        memos.sort_by(|a, b| b.date.cmp(&a.date));
        memos
    }

    /// Appends a memo to its project's list and writes the list back.
    pub async fn append(&self, memo: &Memo) -> Result<()> {
        let mut memos = self.list(&memo.project_id).await;
        memos.push(memo.clone());

        let raw = serde_json::to_string(&memos)?;
        self.kv
            .set(&memo_key(&memo.project_id), &raw)
            .await
            .map_err(|e| RedpillError::data_access(e.to_string()))?;
        Ok(())
    }
}

fn memo_key(project_id: &str) -> String {
    format!("memos-{}", project_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;

    #[tokio::test]
    async fn test_append_and_list() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = MemoStore::new(kv);

        let memo = Memo::new("acme", "Strong team, weak moat.", None, None);
        store.append(&memo).await.unwrap();

        let memos = store.list("acme").await;
        assert_eq!(memos.len(), 1);
        assert_eq!(memos[0].title, "Strong team, weak moat.");
    }

    #[tokio::test]
    async fn test_explicit_title_wins() {
        let memo = Memo::new("acme", "body text", Some("Q3 review".to_string()), None);
        assert_eq!(memo.title, "Q3 review");
    }

    #[tokio::test]
    async fn test_invalid_json_yields_empty_list() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        kv.seed("memos-acme", "[[[");
        let store = MemoStore::new(kv);
        assert!(store.list("acme").await.is_empty());
    }
}
