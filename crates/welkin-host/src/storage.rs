//! Scoped key-value storage capability
//!
//! The host exposes an asynchronous single-key store; the controller uses it
//! for exactly one read at startup and at most one write at close. Both
//! provided implementations are best-effort: the controller treats every
//! failure as "not previously dismissed".

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::Value;

use welkin_core::prelude::*;

/// Asynchronous scoped key-value storage
///
/// Single key per call, no transactions. The `ClientStorage` variant adds
/// `Send` bounds for use inside multi-threaded runtimes.
#[trait_variant::make(ClientStorage: Send)]
pub trait LocalClientStorage {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

// ─────────────────────────────────────────────────────────
// In-memory storage
// ─────────────────────────────────────────────────────────

/// Process-local storage, mostly useful in tests and one-shot sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an entry (test setup convenience)
    pub fn preload(self, key: impl Into<String>, value: Value) -> Self {
        self.entries
            .lock()
            .expect("storage mutex poisoned")
            .insert(key.into(), value);
        self
    }
}

impl ClientStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::storage("storage mutex poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::storage("storage mutex poisoned"))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────
// File-backed storage
// ─────────────────────────────────────────────────────────

/// Storage persisted as a single JSON document on disk
///
/// The whole document is read and rewritten per call; fine for the one
/// read / one write this dialog performs per session.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read_document(&self) -> Result<HashMap<String, Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(doc) => Ok(doc),
                Err(err) => {
                    // A corrupt document is replaced rather than fatal
                    warn!(path = %self.path.display(), %err, "storage file corrupt, starting fresh");
                    Ok(HashMap::new())
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl ClientStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let doc = self.read_document().await?;
        Ok(doc.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut doc = self.read_document().await?;
        doc.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let text = serde_json::to_string_pretty(&doc)?;
        tokio::fs::write(&self.path, text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(ClientStorage::get(&storage, "k").await.unwrap(), None);

        ClientStorage::set(&storage, "k", json!(true)).await.unwrap();
        assert_eq!(ClientStorage::get(&storage, "k").await.unwrap(), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_memory_storage_preload() {
        let storage = MemoryStorage::new().preload("k", json!("yes"));
        assert_eq!(ClientStorage::get(&storage, "k").await.unwrap(), Some(json!("yes")));
    }

    #[tokio::test]
    async fn test_file_storage_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));
        assert_eq!(ClientStorage::get(&storage, "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("storage.json"));

        ClientStorage::set(&storage, "a", json!(true)).await.unwrap();
        ClientStorage::set(&storage, "b", json!(1)).await.unwrap();

        assert_eq!(ClientStorage::get(&storage, "a").await.unwrap(), Some(json!(true)));
        assert_eq!(ClientStorage::get(&storage, "b").await.unwrap(), Some(json!(1)));

        // Values survive a fresh handle to the same path
        let reopened = FileStorage::new(storage.path().clone());
        assert_eq!(ClientStorage::get(&reopened, "a").await.unwrap(), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_file_storage_corrupt_document_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let storage = FileStorage::new(&path);
        assert_eq!(ClientStorage::get(&storage, "k").await.unwrap(), None);

        ClientStorage::set(&storage, "k", json!(true)).await.unwrap();
        assert_eq!(ClientStorage::get(&storage, "k").await.unwrap(), Some(json!(true)));
    }
}
