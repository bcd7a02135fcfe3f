//! Persistence of the whole list under one storage key.
//!
//! The list is saved as a JSON array of items, replacing the previous value on
//! every write. [`TodoPersistence::load`] and [`TodoPersistence::save`] never
//! fail: problems are logged and the in-memory list is left as the source of
//! truth. The `try_*` variants expose the underlying errors.
//!
//! Saves are tagged with a revision taken when the change is reduced. Saves
//! run one at a time, and a save older than one already written is dropped,
//! so storage always ends on the newest snapshot even when the save tasks
//! finish out of order.

use crate::types::TodoItem;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;
use todolist_core::storage::{KeyValueError, KeyValueStore};

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "list";

/// Errors from reading or writing the saved list
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The key-value store failed
    #[error("Storage error: {0}")]
    Storage(#[from] KeyValueError),

    /// The list could not be serialized
    #[error("Failed to encode list: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored value is not a valid list
    #[error("Stored list is malformed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Serializes a list to its stored JSON form
///
/// # Errors
///
/// Returns [`PersistenceError::Encode`] if serialization fails.
pub fn encode(items: &[TodoItem]) -> Result<String, PersistenceError> {
    serde_json::to_string(items).map_err(PersistenceError::Encode)
}

/// Parses the stored JSON form of a list
///
/// # Errors
///
/// Returns [`PersistenceError::Decode`] if `raw` is not a JSON array of items.
pub fn decode(raw: &str) -> Result<Vec<TodoItem>, PersistenceError> {
    serde_json::from_str(raw).map_err(PersistenceError::Decode)
}

/// Loads and saves the list through a [`KeyValueStore`]
#[derive(Clone)]
pub struct TodoPersistence {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    revision: Arc<AtomicU64>,
    // Newest revision handed to storage; held across the write
    last_saved: Arc<Mutex<u64>>,
}

impl TodoPersistence {
    /// Creates an adapter writing under `key`
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            revision: Arc::new(AtomicU64::new(0)),
            last_saved: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an adapter writing under [`DEFAULT_STORAGE_KEY`]
    #[must_use]
    pub fn with_default_key(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::new(storage, DEFAULT_STORAGE_KEY)
    }

    /// The storage key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reserves the revision for the next snapshot to save.
    ///
    /// Must be called in the order the snapshots were taken.
    #[must_use]
    pub fn next_revision(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Reads the saved list
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] if the read fails or
    /// [`PersistenceError::Decode`] if the stored value is malformed.
    pub async fn try_load(&self) -> Result<Option<Vec<TodoItem>>, PersistenceError> {
        let Some(raw) = self.storage.get_item(&self.key).await? else {
            return Ok(None);
        };
        decode(&raw).map(Some)
    }

    /// Writes the full list, replacing whatever was saved before
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Encode`] or [`PersistenceError::Storage`].
    pub async fn try_save(&self, items: &[TodoItem]) -> Result<(), PersistenceError> {
        let raw = encode(items)?;
        self.storage.set_item(&self.key, raw).await?;
        Ok(())
    }

    /// Reads the saved list, falling back to an empty list on any failure
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&self) -> Vec<TodoItem> {
        match self.try_load().await {
            Ok(Some(items)) => {
                tracing::debug!(count = items.len(), "Loaded saved list");
                items
            },
            Ok(None) => {
                tracing::debug!("No saved list, starting empty");
                Vec::new()
            },
            Err(error) => {
                metrics::counter!("persistence.load.failures").increment(1);
                tracing::warn!(error = %error, "Could not load saved list, starting empty");
                Vec::new()
            },
        }
    }

    /// Writes the full list, logging instead of failing
    ///
    /// `revision` comes from [`Self::next_revision`]. A snapshot older than
    /// the last one written is skipped. A failed write is not retried and
    /// does not touch in-memory state.
    #[tracing::instrument(skip(self, items), fields(key = %self.key, count = items.len()))]
    pub async fn save(&self, revision: u64, items: &[TodoItem]) {
        let mut last_saved = self.last_saved.lock().await;
        if revision <= *last_saved {
            tracing::trace!(last_saved = *last_saved, "Skipping stale snapshot");
            return;
        }
        *last_saved = revision;

        match self.try_save(items).await {
            Ok(()) => tracing::trace!("Saved list"),
            Err(error) => {
                metrics::counter!("persistence.save.failures").increment(1);
                tracing::error!(error = %error, "Could not save list");
            },
        }
    }
}

impl std::fmt::Debug for TodoPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoPersistence")
            .field("key", &self.key)
            .field("revision", &self.revision.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemId;
    use todolist_testing::InMemoryKeyValueStore;

    fn item(text: &str) -> TodoItem {
        TodoItem::new(ItemId::from(text.to_string()), text.to_string())
    }

    #[test]
    fn decode_legacy_layout() {
        let raw = r#"[{"key":"milk","text":"milk","complete":true},{"key":"eggs","text":"eggs","complete":false}]"#;
        let items = decode(raw).unwrap_or_default();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId::from("milk".to_string()));
        assert!(items[0].complete);
        assert_eq!(items[1].text, "eggs");
    }

    #[test]
    fn decode_rejects_non_list() {
        assert!(matches!(decode("null"), Err(PersistenceError::Decode(_))));
        assert!(matches!(decode("{not json"), Err(PersistenceError::Decode(_))));
        assert!(matches!(
            decode(r#"[{"text":"no key"}]"#),
            Err(PersistenceError::Decode(_))
        ));
    }

    #[test]
    fn encode_empty_list() {
        assert_eq!(encode(&[]).unwrap_or_default(), "[]");
    }

    #[test]
    fn revisions_increase() {
        let persistence = TodoPersistence::with_default_key(Arc::new(InMemoryKeyValueStore::new()));
        let first = persistence.next_revision();
        let second = persistence.clone().next_revision();
        assert!(second > first);
    }

    #[tokio::test]
    async fn stale_snapshot_does_not_overwrite_newer() {
        let storage = InMemoryKeyValueStore::new();
        let persistence = TodoPersistence::new(Arc::new(storage.clone()), "groceries");
        assert_eq!(persistence.key(), "groceries");

        let older = persistence.next_revision();
        let newer = persistence.next_revision();
        persistence.save(newer, &[item("milk"), item("eggs")]).await;
        persistence.save(older, &[item("milk")]).await;

        assert_eq!(storage.write_count(), 1);
        let saved = decode(&storage.value("groceries").unwrap_or_default()).unwrap_or_default();
        assert_eq!(saved.len(), 2);
    }

    #[tokio::test]
    async fn failed_save_still_counts_as_written() {
        let storage = todolist_testing::FailingKeyValueStore::failing_writes();
        let persistence = TodoPersistence::with_default_key(Arc::new(storage.clone()));

        let older = persistence.next_revision();
        let newer = persistence.next_revision();
        persistence.save(newer, &[item("milk"), item("eggs")]).await;
        storage.set_fail_writes(false);
        persistence.save(older, &[item("milk")]).await;

        assert_eq!(storage.inner().write_count(), 0);
    }
}
