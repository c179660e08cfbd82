//! Storage seam for persisted application state.
//!
//! Business logic never touches the filesystem directly; it goes through
//! [`KeyValueStore`] so tests can substitute an in-memory fake and the
//! infrastructure layer can decide the on-disk layout.

use anyhow::Result;
use async_trait::async_trait;

/// An abstract key-value store for persisted application state.
///
/// Keys are logical names such as `chat-history-<project_id>` or
/// `memos-<project_id>`; values are opaque JSON documents. Implementations
/// decide the physical layout (one file per key, a database table, an
/// in-memory map for tests).
///
/// # Implementation Notes
///
/// Writes are last-write-wins: there is no locking across processes, and
/// callers follow a save-after-mutate discipline rather than transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Key present
    /// - `Ok(None)`: Key absent
    /// - `Err(_)`: Error occurred during retrieval
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key` from the store. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory `KeyValueStore` used by unit tests across the workspace.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing the typed layers. Useful for exercising
    /// corrupt-data handling.
    pub fn seed(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();

        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        // Removing an absent key is fine
        store.remove("k").await.unwrap();
    }
}
