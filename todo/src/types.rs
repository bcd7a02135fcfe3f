//! Domain types for the to-do list.
//!
//! A list is an ordered `Vec` of items. Items are looked up by their text,
//! which is unique within a list, and carry a generated [`ItemId`] that stays
//! stable for the item's lifetime.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a to-do item
///
/// Stored as text so lists written before ids existed, whose `key` field holds
/// the item text, still load.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an `ItemId` from a UUID
    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id.to_string())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single to-do item
///
/// Serializes as `{ "key": ..., "text": ..., "complete": ... }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    #[serde(rename = "key")]
    pub id: ItemId,
    /// Display text, unique within a list
    pub text: String,
    /// Whether the item is done
    pub complete: bool,
}

impl TodoItem {
    /// Creates a new, incomplete item
    #[must_use]
    pub const fn new(id: ItemId, text: String) -> Self {
        Self {
            id,
            text,
            complete: false,
        }
    }

    /// Flips the completion flag
    pub const fn toggle(&mut self) {
        self.complete = !self.complete;
    }
}

/// State of the to-do list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// Items in display order
    pub items: Vec<TodoItem>,
}

impl TodoState {
    /// Creates an empty list
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates a list holding `items` in the given order
    #[must_use]
    pub const fn with_items(items: Vec<TodoItem>) -> Self {
        Self { items }
    }

    /// Returns the number of items
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns the number of completed items
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.complete).count()
    }

    /// Returns the item with the given text
    #[must_use]
    pub fn get(&self, text: &str) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.text == text)
    }

    /// Checks if an item with the given text exists
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.get(text).is_some()
    }

    /// Texts in display order
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.text.as_str()).collect()
    }
}

/// Actions processed by the to-do reducer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Read the saved list from storage
    Load,

    /// Append a new item; ignored when empty or already present
    Add {
        /// Text of the new item
        text: String,
    },

    /// Remove the item with this text, if any
    Delete {
        /// Text of the item to remove
        text: String,
    },

    /// Flip completion of the item with this text, if any
    Toggle {
        /// Text of the item to toggle
        text: String,
    },

    /// Replace the list with a reordered copy of it
    Reorder {
        /// Items in their new order
        items: Vec<TodoItem>,
    },

    // ========== Events ==========
    /// The saved list was read (empty when nothing usable was stored)
    Loaded {
        /// Items read from storage
        items: Vec<TodoItem>,
    },
}
