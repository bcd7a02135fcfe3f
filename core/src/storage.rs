//! Key-value blob storage.
//!
//! The persistence layer keeps the whole list as one string value under one
//! key, the same contract a mobile async key-value store offers. This module
//! only defines that contract; implementations live elsewhere:
//!
//! - `FileKeyValueStore` (in `todolist-filestore`): one file per key on disk
//! - `InMemoryKeyValueStore` (in `todolist-testing`): `HashMap`-backed, for tests
//!
//! # Dyn Compatibility
//!
//! Methods return `BoxFuture` instead of using `async fn` so the store can be
//! held as `Arc<dyn KeyValueStore>` and moved into effect futures.

use futures::future::BoxFuture;
use thiserror::Error;

/// Errors reported by a [`KeyValueStore`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyValueError {
    /// The key cannot be stored by this backend (empty, too long, ...).
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Reading the value failed.
    #[error("Read failed for key {key}: {message}")]
    ReadFailed {
        /// Key being read.
        key: String,
        /// Backend error message.
        message: String,
    },

    /// Writing the value failed.
    #[error("Write failed for key {key}: {message}")]
    WriteFailed {
        /// Key being written.
        key: String,
        /// Backend error message.
        message: String,
    },
}

/// Result type for key-value operations.
pub type Result<T> = std::result::Result<T, KeyValueError>;

/// String blob storage addressed by string keys.
///
/// Writes replace the previous value unconditionally. Implementations must be
/// `Send + Sync` so a single instance can be shared by concurrent save effects.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueError::ReadFailed`] if the backend cannot be read, or
    /// [`KeyValueError::InvalidKey`] if the key is not representable.
    fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>>;

    /// Store `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueError::WriteFailed`] if the backend cannot be written, or
    /// [`KeyValueError::InvalidKey`] if the key is not representable.
    fn set_item<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<()>>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueError::WriteFailed`] if the backend cannot be written.
    fn remove_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_key() {
        let err = KeyValueError::WriteFailed {
            key: "list".to_string(),
            message: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Write failed for key list: disk full");
        assert_eq!(
            KeyValueError::InvalidKey(String::new()).to_string(),
            "Invalid key: "
        );
    }
}
