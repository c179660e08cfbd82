//! File-backed `KeyValueStore`.
//!
//! One JSON document per key:
//!
//! ```text
//! base_dir/
//! ├── chat-history-acme.json
//! └── memos-acme.json
//! ```
//!
//! Writes are whole-file replacements, last-write-wins across processes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redpill_core::storage::KeyValueStore;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `base_dir`, creating the directory if
    /// needed.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)
            .await
            .context("Failed to create store directory")?;
        Ok(Self { base_dir })
    }

    /// Creates the store at the default location (`~/.redpill/store`).
    pub async fn default_location() -> Result<Self> {
        Self::new(crate::paths::RedpillPaths::store_dir()?).await
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize(key)))
    }
}

/// Keys become filenames; anything outside `[A-Za-z0-9._-]` is mapped to
/// `_` so a hostile project id cannot escape the store directory.
fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.file_path(key);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context(format!("Failed to read store file: {:?}", path)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.file_path(key);
        fs::write(&path, value)
            .await
            .context(format!("Failed to write store file: {:?}", path))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.file_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context(format!("Failed to remove store file: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path()).await.unwrap();

        assert_eq!(store.get("chat-history-acme").await.unwrap(), None);

        store.set("chat-history-acme", "[]").await.unwrap();
        assert_eq!(
            store.get("chat-history-acme").await.unwrap(),
            Some("[]".to_string())
        );

        store.set("chat-history-acme", "[1]").await.unwrap();
        assert_eq!(
            store.get("chat-history-acme").await.unwrap(),
            Some("[1]".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path()).await.unwrap();

        store.set("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_hostile_key_stays_in_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path()).await.unwrap();

        store.set("../escape/attempt", "v").await.unwrap();
        assert_eq!(
            store.get("../escape/attempt").await.unwrap(),
            Some("v".to_string())
        );

        // The only artifacts live directly under the base dir
        let mut entries = tokio::fs::read_dir(temp_dir.path()).await.unwrap();
        let entry = entries.next_entry().await.unwrap().unwrap();
        assert!(entry.file_type().await.unwrap().is_file());
        assert!(entries.next_entry().await.unwrap().is_none());
    }
}
