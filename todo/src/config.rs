//! Configuration for the to-do application.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::persistence::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the saved list (`TODO_DATA_DIR`)
    pub data_dir: PathBuf,
    /// Key the list is saved under (`TODO_STORAGE_KEY`)
    pub storage_key: String,
    /// Log filter used when `RUST_LOG` is not set (`TODO_LOG_LEVEL`)
    pub log_level: String,
    /// Seconds to wait for pending saves on exit (`TODO_SHUTDOWN_TIMEOUT`)
    pub shutdown_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".todo-data"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: "info".to_string(),
            shutdown_timeout: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Missing values, and numbers that fail to parse, fall back to defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            data_dir: lookup("TODO_DATA_DIR")
                .filter(|s| !s.is_empty())
                .map_or(defaults.data_dir, PathBuf::from),
            storage_key: lookup("TODO_STORAGE_KEY")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.storage_key),
            log_level: lookup("TODO_LOG_LEVEL")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.log_level),
            shutdown_timeout: lookup("TODO_SHUTDOWN_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.shutdown_timeout),
        }
    }

    /// Shutdown timeout as a `Duration`
    #[must_use]
    pub const fn shutdown_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.shutdown_timeout)
    }
}
