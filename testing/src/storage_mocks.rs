//! In-memory key-value stores for persistence tests
//!
//! - [`InMemoryKeyValueStore`]: `HashMap`-backed store that records every write
//! - [`FailingKeyValueStore`]: store whose reads and/or writes always fail

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a test panic

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use todolist_core::storage::{KeyValueError, KeyValueStore, Result};

/// In-memory key-value store for fast, deterministic tests.
///
/// Clones share the same data, so a test can keep one clone for inspection
/// while the environment owns another.
///
/// # Example
///
/// ```
/// use todolist_testing::InMemoryKeyValueStore;
/// use todolist_core::storage::KeyValueStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryKeyValueStore::new();
/// store.set_item("list", "[]".to_string()).await?;
/// assert_eq!(store.get_item("list").await?, Some("[]".to_string()));
/// assert_eq!(store.write_count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryKeyValueStore {
    data: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<RwLock<Vec<(String, String)>>>,
}

impl InMemoryKeyValueStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry
    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .data
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Current value under `key`, read synchronously
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.data.read().unwrap().get(key).cloned()
    }

    /// Number of `set_item` calls so far
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.read().unwrap().len()
    }

    /// Every `(key, value)` written, in call order
    #[must_use]
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.read().unwrap().clone()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move { Ok(self.value(key)) })
    }

    fn set_item<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.writes
                .write()
                .unwrap()
                .push((key.to_string(), value.clone()));
            self.data.write().unwrap().insert(key.to_string(), value);
            Ok(())
        })
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.data.write().unwrap().remove(key);
            Ok(())
        })
    }
}

/// Key-value store that fails on demand.
///
/// Wraps an [`InMemoryKeyValueStore`] so successful operations still behave
/// normally; failure switches can be flipped while a test runs.
#[derive(Clone, Debug, Default)]
pub struct FailingKeyValueStore {
    inner: InMemoryKeyValueStore,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FailingKeyValueStore {
    /// A store whose reads fail
    #[must_use]
    pub fn failing_reads() -> Self {
        let store = Self::default();
        store.set_fail_reads(true);
        store
    }

    /// A store whose writes fail
    #[must_use]
    pub fn failing_writes() -> Self {
        let store = Self::default();
        store.set_fail_writes(true);
        store
    }

    /// Toggle read failures
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Toggle write failures
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The backing store, for inspecting what did get written
    #[must_use]
    pub const fn inner(&self) -> &InMemoryKeyValueStore {
        &self.inner
    }
}

impl KeyValueStore for FailingKeyValueStore {
    fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Box::pin(async move {
                Err(KeyValueError::ReadFailed {
                    key: key.to_string(),
                    message: "simulated read failure".to_string(),
                })
            });
        }
        self.inner.get_item(key)
    }

    fn set_item<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<()>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Box::pin(async move {
                Err(KeyValueError::WriteFailed {
                    key: key.to_string(),
                    message: "simulated write failure".to_string(),
                })
            });
        }
        self.inner.set_item(key, value)
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Box::pin(async move {
                Err(KeyValueError::WriteFailed {
                    key: key.to_string(),
                    message: "simulated write failure".to_string(),
                })
            });
        }
        self.inner.remove_item(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_overwrites_and_records_writes() {
        let store = InMemoryKeyValueStore::new();
        store.set_item("list", "a".to_string()).await.unwrap();
        store.set_item("list", "b".to_string()).await.unwrap();

        assert_eq!(store.get_item("list").await.unwrap(), Some("b".to_string()));
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.writes()[0], ("list".to_string(), "a".to_string()));
    }

    #[tokio::test]
    async fn test_in_memory_missing_key_is_none() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get_item("absent").await.unwrap(), None);
        store.remove_item("absent").await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_store_switches() {
        let store = FailingKeyValueStore::failing_writes();
        let err = store.set_item("list", "[]".to_string()).await.unwrap_err();
        assert!(matches!(err, KeyValueError::WriteFailed { .. }));
        assert_eq!(store.inner().write_count(), 0);

        store.set_fail_writes(false);
        store.set_item("list", "[]".to_string()).await.unwrap();
        assert_eq!(store.inner().value("list"), Some("[]".to_string()));
    }

    #[test]
    fn test_failing_reads_blocking() {
        let store = FailingKeyValueStore::failing_reads();
        let result = tokio_test::block_on(store.get_item("list"));
        assert!(matches!(result, Err(KeyValueError::ReadFailed { .. })));
    }
}
