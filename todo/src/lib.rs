//! Single-list to-do application.
//!
//! Items can be added, completed, deleted and reordered. The list lives in a
//! [`TodoState`] driven by [`TodoReducer`]; every change is written in full to
//! a key-value store through [`TodoPersistence`], and read back on start.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo::{TodoAction, TodoEnvironment, TodoPersistence, TodoReducer, TodoState};
//! use todolist_core::environment::RandomIdGenerator;
//! use todolist_filestore::FileKeyValueStore;
//! use todolist_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FileKeyValueStore::open("./.todo-data").await?;
//! let env = TodoEnvironment::new(
//!     Arc::new(RandomIdGenerator),
//!     TodoPersistence::with_default_key(Arc::new(storage)),
//! );
//! let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//! // Hydrate from storage
//! store.send(TodoAction::Load).await?.wait().await;
//!
//! store.send(TodoAction::Add { text: "Buy milk".to_string() }).await?;
//! store.send(TodoAction::Toggle { text: "Buy milk".to_string() }).await?;
//!
//! let done = store.state(TodoState::completed_count).await;
//! println!("Completed: {done}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod persistence;
pub mod reducer;
pub mod shell;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use persistence::{PersistenceError, TodoPersistence};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{ItemId, TodoAction, TodoItem, TodoState};

/// The runtime store specialized to the to-do list
pub type TodoStore =
    todolist_runtime::Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;
