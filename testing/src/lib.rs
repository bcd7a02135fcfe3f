//! # Todolist Testing
//!
//! Testing utilities and helpers for the todolist architecture.
//!
//! This crate provides:
//! - Mock implementations of environment traits
//! - In-memory and failing key-value stores
//! - The [`ReducerTest`] Given-When-Then builder
//! - proptest strategies for list contents
//!
//! ## Example
//!
//! ```ignore
//! use todolist_testing::{InMemoryKeyValueStore, SequentialIdGenerator};
//! use todolist_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_add_persists() {
//!     let storage = InMemoryKeyValueStore::new();
//!     let env = test_environment(storage.clone());
//!     let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//!     let mut handle = store.send(TodoAction::Add { text: "milk".into() }).await?;
//!     handle.wait().await;
//!
//!     assert_eq!(storage.write_count(), 1);
//! }
//! ```

use todolist_core::environment::IdGenerator;
use uuid::Uuid;


/// In-memory key-value stores
pub mod storage_mocks;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{IdGenerator, Uuid};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Id generator producing `00000000-0000-0000-0000-000000000001`,
    /// `...0002`, and so on.
    ///
    /// # Example
    ///
    /// ```
    /// use todolist_testing::mocks::SequentialIdGenerator;
    /// use todolist_core::environment::IdGenerator;
    /// use uuid::Uuid;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id(), Uuid::from_u128(1));
    /// assert_eq!(ids.next_id(), Uuid::from_u128(2));
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        issued: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id is 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                issued: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> Uuid {
            let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            Uuid::from_u128(u128::from(n))
        }
    }
}

/// Property-based testing utilities
///
/// Texts are drawn from a tiny alphabet so generated sequences hit duplicates
/// often, which is where the interesting list behavior lives.
pub mod properties {
    use proptest::prelude::*;

    /// Non-empty item text, short enough to collide frequently
    pub fn item_text() -> impl Strategy<Value = String> {
        "[a-c]{1,2}"
    }

    /// Item text that is sometimes empty
    pub fn candidate_text() -> impl Strategy<Value = String> {
        prop_oneof![
            1 => Just(String::new()),
            4 => item_text(),
        ]
    }

    /// A permutation of `0..len`
    pub fn permutation(len: usize) -> impl Strategy<Value = Vec<usize>> {
        Just((0..len).collect::<Vec<_>>()).prop_shuffle()
    }
}

// Re-export commonly used items
pub use mocks::SequentialIdGenerator;
pub use reducer_test::{ReducerTest, assertions};
pub use storage_mocks::{FailingKeyValueStore, InMemoryKeyValueStore};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new();
        let first = ids.next_id();
        let second = ids.next_id();
        assert_ne!(first, second);
        assert_eq!(second, Uuid::from_u128(2));
    }

    proptest! {
        #[test]
        fn permutation_contains_every_index(
            (len, perm) in (0usize..8).prop_flat_map(|len| (Just(len), properties::permutation(len)))
        ) {
            let mut sorted = perm;
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..len).collect::<Vec<_>>());
        }

        #[test]
        fn item_text_is_never_empty(text in properties::item_text()) {
            prop_assert!(!text.is_empty());
        }
    }
}
