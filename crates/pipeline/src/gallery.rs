//! Gallery collaborator: append-only record of finished videos.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kvstore::{KvStore, Storage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const GALLERY_KEY: &str = "gallery";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntry {
    pub id: String,
    pub video_url: String,
    pub thumbnail_ref: Option<String>,
    pub script: String,
    pub created_at: DateTime<Utc>,
}

impl GalleryEntry {
    pub fn new(video_url: String, script: String, thumbnail_ref: Option<String>) -> Self {
        Self {
            id: format!("video_{}", Uuid::new_v4()),
            video_url,
            thumbnail_ref,
            script,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait Gallery: Send + Sync {
    /// Record one finished video. Called at most once per successful session.
    async fn add_entry(&self, entry: GalleryEntry) -> anyhow::Result<()>;
}

/// Gallery persisted as a single list in the key-value store, newest first.
pub struct GalleryStore<S: Storage> {
    store: Mutex<KvStore<S>>,
}

impl<S: Storage> GalleryStore<S> {
    pub fn new(store: KvStore<S>) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    pub fn list(&self) -> Vec<GalleryEntry> {
        self.store
            .lock()
            .unwrap()
            .get(GALLERY_KEY)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn remove(&self, id: &str) -> anyhow::Result<()> {
        let mut store = self.store.lock().unwrap();
        let mut entries: Vec<GalleryEntry> = store.get(GALLERY_KEY)?.unwrap_or_default();
        entries.retain(|e| e.id != id);
        store.set(GALLERY_KEY, &entries)?;
        Ok(())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        self.store.lock().unwrap().remove(GALLERY_KEY)?;
        Ok(())
    }
}

#[async_trait]
impl<S: Storage + 'static> Gallery for GalleryStore<S> {
    async fn add_entry(&self, entry: GalleryEntry) -> anyhow::Result<()> {
        let mut store = self.store.lock().unwrap();
        let mut entries: Vec<GalleryEntry> = store.get(GALLERY_KEY)?.unwrap_or_default();
        entries.insert(0, entry);
        store.set(GALLERY_KEY, &entries)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvstore::InMemoryStorage;

    fn gallery() -> GalleryStore<InMemoryStorage> {
        GalleryStore::new(KvStore::new(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn newest_entry_first() {
        let store = gallery();
        store
            .add_entry(GalleryEntry::new("v://1".into(), "first".into(), None))
            .await
            .unwrap();
        store
            .add_entry(GalleryEntry::new("v://2".into(), "second".into(), None))
            .await
            .unwrap();

        let entries = store.list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].script, "second");
        assert_eq!(entries[1].script, "first");
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let store = gallery();
        store
            .add_entry(GalleryEntry::new("v://1".into(), "one".into(), None))
            .await
            .unwrap();
        let id = store.list()[0].id.clone();

        store.remove(&id).unwrap();
        assert!(store.list().is_empty());

        store
            .add_entry(GalleryEntry::new("v://2".into(), "two".into(), None))
            .await
            .unwrap();
        store.clear().unwrap();
        assert!(store.list().is_empty());
    }
}
