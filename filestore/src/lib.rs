//! Filesystem key-value store for todolist.
//!
//! This crate provides the production implementation of the `KeyValueStore`
//! trait from `todolist-core`. Each key maps to one file inside a data
//! directory:
//!
//! - Writes go to a temporary sibling file which is synced to disk and then
//!   renamed over the target, so a reader never observes a half-written value
//! - Writes through one store (and its clones) are serialized, so concurrent
//!   `set_item` calls for a key never interleave
//! - Key characters outside `[A-Za-z0-9_-]` are escaped as `%XX` per byte, so
//!   any non-empty key maps to a single file name
//!
//! # Example
//!
//! ```no_run
//! use todolist_filestore::FileKeyValueStore;
//! use todolist_core::storage::KeyValueStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileKeyValueStore::open("./.todo-data").await?;
//! store.set_item("list", "[]".to_string()).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use futures::future::BoxFuture;
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use todolist_core::storage::{KeyValueError, KeyValueStore, Result};

const VALUE_EXTENSION: &str = "value";

/// Key-value store persisting each key as a file in one directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
    // Held across write + rename
    write_lock: Arc<Mutex<()>>,
}

impl FileKeyValueStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueError::WriteFailed`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| KeyValueError::WriteFailed {
                key: dir.display().to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(dir = %dir.display(), "Opened file key-value store");
        Ok(Self {
            dir,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Directory holding the value files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueError::InvalidKey`] for the empty key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(KeyValueError::InvalidKey(key.to_string()));
        }
        Ok(self
            .dir
            .join(format!("{}.{VALUE_EXTENSION}", encode_key(key))))
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KeyValueError::ReadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4().simple()));
        let write_failed = |e: std::io::Error| KeyValueError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        };

        let _guard = self.write_lock.lock().await;
        let result = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(value.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, &path).await
        }
        .await;

        if let Err(e) = result {
            // Leave nothing behind whichever step failed
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(write_failed(e));
        }

        tracing::trace!(key, bytes = value.len(), "Wrote value file");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KeyValueError::WriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(self.read(key))
    }

    fn set_item<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.write(key, value))
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.remove(key))
    }
}

/// Escape a key into a portable file stem.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}
