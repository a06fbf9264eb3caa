//! Persistent key-value store
//!
//! Typed get/set/remove of JSON-serializable values over a pluggable storage
//! backend. Collaborators (usage counters, the gallery index, onboarding
//! flags) share one store; each owns its key namespace.

mod storage;

pub use storage::{FileBackedStorage, InMemoryStorage, Storage};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Corrupt store file: {0}")]
    Corrupt(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Typed front over a [`Storage`] backend.
pub struct KvStore<S: Storage> {
    storage: S,
}

impl<S: Storage> KvStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.storage.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.storage.put(key, serde_json::to_value(value)?)
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.delete(key)
    }

    /// Read-modify-write of a numeric counter. Missing keys count as zero.
    pub fn increment(&mut self, key: &str, by: i64) -> Result<i64> {
        let current: i64 = self.get(key)?.unwrap_or(0);
        let next = current + by;
        self.set(key, &next)?;
        Ok(next)
    }
}

impl KvStore<FileBackedStorage> {
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self> {
        Ok(Self::new(FileBackedStorage::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_roundtrip() {
        let mut store = KvStore::new(InMemoryStorage::new());
        store.set("onboarding_completed", &true).unwrap();

        let flag: Option<bool> = store.get("onboarding_completed").unwrap();
        assert_eq!(flag, Some(true));
        let missing: Option<bool> = store.get("nope").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn remove_clears_key() {
        let mut store = KvStore::new(InMemoryStorage::new());
        store.set("user_id", &"u-1").unwrap();
        store.remove("user_id").unwrap();

        let gone: Option<String> = store.get("user_id").unwrap();
        assert_eq!(gone, None);
    }

    #[test]
    fn increment_defaults_to_zero() {
        let mut store = KvStore::new(InMemoryStorage::new());
        assert_eq!(store.increment("video_count", 1).unwrap(), 1);
        assert_eq!(store.increment("video_count", 1).unwrap(), 2);
    }

    #[test]
    fn file_backed_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let mut store = KvStore::open(&path).unwrap();
            store.set("video_count", &3i64).unwrap();
        }

        let store = KvStore::open(&path).unwrap();
        let count: Option<i64> = store.get("video_count").unwrap();
        assert_eq!(count, Some(3));
    }

    #[test]
    fn file_backed_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            KvStore::open(&path),
            Err(StoreError::Corrupt(_))
        ));
    }
}
