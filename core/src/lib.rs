//! # Vitrine Core
//!
//! Core traits and types for the Vitrine reducer architecture.
//!
//! Interactive front-ends built on Vitrine keep every piece of mutable UI state
//! behind a reducer. Pointer events, timers and user commands all arrive as
//! actions, and anything that touches the outside world (storage writes,
//! deferred callbacks) is returned as an [`Effect`](effect::Effect) description
//! for the runtime to execute.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```
//! use vitrine_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct BadgeState {
//!     count: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum BadgeAction {
//!     Bump,
//! }
//!
//! struct BadgeReducer;
//!
//! impl Reducer for BadgeReducer {
//!     type State = BadgeState;
//!     type Action = BadgeAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BadgeState,
//!         action: BadgeAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<BadgeAction>; 4]> {
//!         match action {
//!             BadgeAction::Bump => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = BadgeState::default();
//! let _ = BadgeReducer.reduce(&mut state, BadgeAction::Bump, &());
//! assert_eq!(state.count, 1);
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Declarative macros for building effects
pub mod effect_macros;

/// Action module - Unified input type for reducers
///
/// Actions represent every input a reducer can see: commands issued by the
/// user or the view layer, and events such as timer completions.
pub mod action {
    /// Classification and naming shared by every action enum.
    ///
    /// Normally derived with `#[derive(Action)]` from `vitrine-macros`, which
    /// reads `#[command]` and `#[event]` variant attributes.
    ///
    /// The runtime uses [`Action::name`] to label tracing spans.
    pub trait Action {
        /// The variant name, used for logging
        fn name(&self) -> &'static str;

        /// Returns true if this action is a command (an intent to change state)
        fn is_command(&self) -> bool;

        /// Returns true if this action is an event (something that happened)
        fn is_event(&self) -> bool;
    }
}

/// State module - Domain state helpers
pub mod state {
    use serde::{Deserialize, Serialize};

    /// Monotonic revision counter for a piece of state.
    ///
    /// Bumped on every applied mutation so that side effects which observe
    /// the state (such as persistence writes) can be ordered even when they
    /// complete out of order.
    #[derive(
        Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct Revision(u64);

    impl Revision {
        /// The revision of freshly constructed state
        pub const INITIAL: Self = Self(0);

        /// Create a revision from a raw counter value
        #[must_use]
        pub const fn new(value: u64) -> Self {
            Self(value)
        }

        /// The raw counter value
        #[must_use]
        pub const fn value(self) -> u64 {
            self.0
        }

        /// The revision that follows this one
        #[must_use]
        pub const fn next(self) -> Self {
            Self(self.0.saturating_add(1))
        }
    }

    impl std::fmt::Display for Revision {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "r{}", self.0)
        }
    }
}

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
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
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
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
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and can be lifted into a parent
/// action type with [`Effect::map`].
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Delayed action (settle timers, debounces)
        ///
        /// The runtime does not cancel delays. Reducers that need
        /// cancellation put a ticket in the action and ignore it on arrival
        /// when the ticket no longer matches state.
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Returns true for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }

        /// Lift an effect into a parent action type.
        ///
        /// Used when a parent reducer delegates to a child reducer and has to
        /// wrap whatever actions the child's effects feed back.
        ///
        /// ```
        /// use vitrine_core::effect::Effect;
        /// use std::time::Duration;
        ///
        /// #[derive(Debug)]
        /// enum Child { Tick }
        /// #[derive(Debug)]
        /// enum Parent { Child(Child) }
        ///
        /// let effect = Effect::Delay {
        ///     duration: Duration::from_millis(5),
        ///     action: Box::new(Child::Tick),
        /// };
        /// let lifted: Effect<Parent> = effect.map(Parent::Child);
        /// assert!(matches!(lifted, Effect::Delay { .. }));
        /// ```
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            F: FnOnce(Action) -> B + Send + 'static,
            Action: 'static,
            B: 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use thiserror::Error;

    /// Errors raised by a [`KeyValueStore`]
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// The backing medium failed
        #[error("storage I/O failed for key {key}: {source}")]
        Io {
            /// Key being read or written
            key: String,
            /// Underlying I/O error
            #[source]
            source: std::io::Error,
        },

        /// The store refused the operation (quota, disabled storage, ...)
        #[error("storage unavailable: {0}")]
        Unavailable(String),
    }

    /// Durable local key-value blob storage.
    ///
    /// Mirrors what a browser's local storage offers: string values under
    /// string keys, synchronous access, no transactions.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - one file per key
    /// let store = FileKeyValueStore::new("/var/lib/storefront");
    ///
    /// // Test - in memory
    /// let store = InMemoryKeyValueStore::new();
    /// ```
    pub trait KeyValueStore: Send + Sync {
        /// Read the value stored under `key`, `None` when absent
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] when the medium cannot be read.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Store `value` under `key`, replacing any previous value
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] when the medium cannot be written.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::state::Revision;
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    enum Child {
        Loaded(u32),
    }

    #[derive(Debug, PartialEq)]
    enum Parent {
        Child(Child),
    }

    #[test]
    fn revision_is_monotonic() {
        let first = Revision::INITIAL;
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 1);
        assert_eq!(second.to_string(), "r1");
    }

    #[test]
    fn map_preserves_delay_duration() {
        let effect = Effect::Delay {
            duration: Duration::from_millis(180),
            action: Box::new(Child::Loaded(1)),
        };

        match effect.map(Parent::Child) {
            Effect::Delay { duration, action } => {
                assert_eq!(duration, Duration::from_millis(180));
                assert_eq!(*action, Parent::Child(Child::Loaded(1)));
            },
            other => unreachable!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn map_wraps_future_output() {
        let effect: Effect<Child> = Effect::Future(Box::pin(async { Some(Child::Loaded(7)) }));

        let Effect::Future(fut) = effect.map(Parent::Child) else {
            unreachable!("map must keep the Future variant");
        };
        let output = tokio_test::block_on(fut);
        assert_eq!(output, Some(Parent::Child(Child::Loaded(7))));
    }
}
