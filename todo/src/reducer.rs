//! Reducer logic for the to-do list.
//!
//! Every action that changes the list returns one effect that saves the full
//! list. Rejected adds return no effect. `Load` returns an effect that reads
//! storage and feeds `Loaded` back; applying `Loaded` does not save.

use crate::persistence::TodoPersistence;
use crate::types::{ItemId, TodoAction, TodoItem, TodoState};
use std::sync::Arc;
use todolist_core::{
    SmallVec, effect::Effect, environment::IdGenerator, reducer::Reducer, smallvec,
};

/// Environment dependencies for the to-do reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of ids for new items
    pub ids: Arc<dyn IdGenerator>,
    /// Where the list is saved
    pub persistence: TodoPersistence,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, persistence: TodoPersistence) -> Self {
        Self { ids, persistence }
    }
}

/// Reducer for the to-do list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Effect that writes a snapshot of the current list
    fn save(state: &TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let persistence = env.persistence.clone();
        let revision = persistence.next_revision();
        let items = state.items.clone();
        Effect::fire_and_forget(async move { persistence.save(revision, &items).await })
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::Load => {
                let persistence = env.persistence.clone();
                smallvec![Effect::future(async move {
                    Some(TodoAction::Loaded {
                        items: persistence.load().await,
                    })
                })]
            },

            TodoAction::Loaded { items } => {
                state.items = items;
                SmallVec::new()
            },

            TodoAction::Add { text } => {
                if text.is_empty() {
                    tracing::info!("Ignoring empty item");
                    return SmallVec::new();
                }
                if state.contains(&text) {
                    tracing::info!(text = %text, "Ignoring duplicate item");
                    return SmallVec::new();
                }

                let id = ItemId::from_uuid(env.ids.next_id());
                state.items.push(TodoItem::new(id, text));
                smallvec![Self::save(state, env)]
            },

            TodoAction::Delete { text } => {
                state.items.retain(|item| item.text != text);
                smallvec![Self::save(state, env)]
            },

            TodoAction::Toggle { text } => {
                for item in state.items.iter_mut().filter(|item| item.text == text) {
                    item.toggle();
                }
                smallvec![Self::save(state, env)]
            },

            TodoAction::Reorder { items } => {
                state.items = items;
                smallvec![Self::save(state, env)]
            },
        }
    }
}
