//! # Todolist Core
//!
//! Core traits and types for the todolist architecture.
//!
//! The application logic is written as a reducer over explicit state. Anything
//! that touches the outside world (storage, id generation) is injected through
//! the environment and performed by the runtime as an [`effect::Effect`].
//!
//! ## Core Concepts
//!
//! - **State**: The in-memory list and anything else the feature owns
//! - **Action**: All inputs to a reducer (user intents and effect results)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: A description of a side effect, executed by the runtime
//! - **Environment**: Injected dependencies behind traits
//!
//! ## Example
//!
//! ```ignore
//! use todolist_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for ListReducer {
//!     type State = ListState;
//!     type Action = ListAction;
//!     type Environment = ListEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut ListState,
//!         action: ListAction,
//!         env: &ListEnvironment,
//!     ) -> SmallVec<[Effect<ListAction>; 4]> {
//!         // Mutate state, describe side effects
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Key-value blob storage abstraction used for persistence
pub mod storage;

/// Reducer module - The core trait for application logic
///
/// Reducers are deterministic: `(State, Action, Environment) → (State, Effects)`.
/// All I/O is returned as effect descriptions instead of being performed inline.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for application logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Implementations update `state` in place and return the effects the
        /// runtime should execute. Most actions produce zero or one effect, so
        /// the return type keeps up to four inline without allocating.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values. The reducer returns them and the runtime executes them.
pub mod effect {
    use futures::future::BoxFuture;
    use std::future::Future;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type an effect may feed back into the reducer
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(BoxFuture<'static, Option<Action>>),
    }

    impl<Action> Effect<Action> {
        /// Wrap an async block as an [`Effect::Future`]
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Self::Future(Box::pin(fut))
        }

        /// Wrap an async block whose result is not fed back into the reducer
        pub fn fire_and_forget<F>(fut: F) -> Self
        where
            F: Future<Output = ()> + Send + 'static,
        {
            Self::Future(Box::pin(async move {
                fut.await;
                None
            }))
        }

        /// Returns true for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Self::None)
        }
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// External dependencies are abstracted behind traits and injected via the
/// reducer's environment, so tests can swap in deterministic versions.
pub mod environment {
    use uuid::Uuid;

    /// Source of fresh identifiers
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - predictable ids
    /// struct SequentialIdGenerator { next: AtomicU128 }
    /// impl IdGenerator for SequentialIdGenerator {
    ///     fn next_id(&self) -> Uuid {
    ///         Uuid::from_u128(self.next.fetch_add(1, Ordering::SeqCst))
    ///     }
    /// }
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Produce an identifier not handed out before
        fn next_id(&self) -> Uuid;
    }

    /// Production id generator backed by random v4 UUIDs
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIdGenerator;

    impl IdGenerator for RandomIdGenerator {
        fn next_id(&self) -> Uuid {
            Uuid::new_v4()
        }
    }
}
