//! # Vitrine Runtime
//!
//! Runtime implementation for the Vitrine reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Effect Handle**: Lets callers wait until the effects of one action finished
//!
//! ## Atomicity
//!
//! Every reducer call runs while the Store holds the state write lock. A
//! reducer that checks a condition and mutates on it (for example "is there
//! stock left? then reserve one") is therefore atomic with respect to every
//! other action, no matter how many tasks send concurrently.
//!
//! ## Example
//!
//! ```ignore
//! use vitrine_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action and wait for its effects
//! store.send(Action::DoSomething).await?.wait().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use vitrine_core::{action::Action, effect::Effect, reducer::Reducer};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects (typically pending delays) were still running when
        /// the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects of one
/// action to complete. Effects of actions fed back by those effects are not
/// tracked.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // All effects from Action::Start are now complete
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new handle and the tracking context that feeds it
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Action, Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration,
        Effect, EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StoreError,
    };
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Actions produced by effects (delays, futures), for observers
        /// such as a view layer that re-renders on timer completions.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Action + Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast channel holds 16 actions; use
        /// [`Store::with_broadcast_capacity`] for chattier features.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new store with a custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// Number of effects still running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Initiate graceful shutdown
        ///
        /// Rejects new actions, then waits for in-flight effects.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            metrics::counter!("store.shutdown.initiated").increment(1);

            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    metrics::counter!("store.shutdown.timeout").increment(1);
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Executes returned effects asynchronously
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// `send()` returns after starting effect execution, not completion.
        /// Use the returned [`EffectHandle`] to wait.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic will propagate and halt the store.
        /// Reducers should be pure functions that do not panic.
        #[tracing::instrument(skip(self, action), fields(action = action.name()), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError>
        where
            R: Clone,
            E: Clone,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect_internal(effect, tracking.clone());
            }

            Ok(handle)
        }

        /// Subscribe to actions produced by effects
        ///
        /// Only feedback actions are broadcast, not the actions passed to
        /// [`Store::send`] directly.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let badge = store.state(|s| s.cart.total_item_count()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Injected dependencies, for readers that derive views from state
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Execute an effect with tracking
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, sends resulting action if `Some`
        /// - `Delay`: Waits for duration, then sends action
        ///
        /// Effect failures are isolated in their spawned task; the
        /// [`DecrementGuard`] keeps the counters right even on panic.
        #[allow(clippy::needless_pass_by_value)] // tracking is cloned per spawned task
        fn execute_effect_internal(&self, effect: Effect<A>, tracking: EffectTracking)
        where
            R: Clone,
            E: Clone,
        {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let (guard, pending_guard) = self.begin_effect(&tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        let _pending_guard = pending_guard;

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            let _ = store.action_broadcast.send(action.clone());
                            let _ = store.send(action).await;
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    let (guard, pending_guard) = self.begin_effect(&tracking);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        let _pending_guard = pending_guard;

                        tokio::time::sleep(duration).await;
                        let _ = store.action_broadcast.send((*action).clone());
                        let _ = store.send(*action).await;
                    });
                },
            }
        }

        /// Register a spawned effect with both the per-action handle and the
        /// store-wide shutdown counter
        fn begin_effect(&self, tracking: &EffectTracking) -> (DecrementGuard, AtomicCounterGuard) {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            (
                DecrementGuard(tracking.clone()),
                AtomicCounterGuard(Arc::clone(&self.pending_effects)),
            )
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{smallvec, SmallVec};
    use vitrine_macros::Action;

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Action, Debug, Clone)]
    enum TestAction {
        #[command]
        Increment,
        #[command]
        Decrement,
        #[command]
        ProduceEffect,
        #[command]
        ProduceDelayedAction,
        #[command]
        ProduceSeveralEffects,
        #[command]
        ProducePanickingEffect,
        #[command]
        ReserveIfBelow { limit: i32 },
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))]
                },
                TestAction::ProduceDelayedAction => smallvec![Effect::Delay {
                    duration: Duration::from_millis(10),
                    action: Box::new(TestAction::Increment),
                }],
                TestAction::ProduceSeveralEffects => smallvec![
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    Effect::Delay {
                        duration: Duration::from_millis(5),
                        action: Box::new(TestAction::Decrement),
                    },
                ],
                TestAction::ProducePanickingEffect => {
                    #[allow(clippy::panic)] // Intentional panic for testing error handling
                    {
                        smallvec![Effect::Future(Box::pin(async {
                            panic!("Intentional panic in effect for testing");
                        }))]
                    }
                },
                TestAction::ReserveIfBelow { limit } => {
                    if state.value < limit {
                        state.value += 1;
                    }
                    SmallVec::new()
                },
            }
        }
    }

    fn test_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = test_store();

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 0);
    }

    #[tokio::test]
    async fn test_multiple_actions() {
        let store = test_store();

        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Decrement).await;

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn test_effect_future_handle_waits() -> Result<(), StoreError> {
        let store = test_store();

        let mut handle = store.send(TestAction::ProduceEffect).await?;
        handle.wait().await;

        // The feedback action was reduced before the effect finished
        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
        assert_eq!(handle.pending(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_effect_delay() -> Result<(), StoreError> {
        let store = test_store();

        let mut handle = store.send(TestAction::ProduceDelayedAction).await?;

        // Value should still be 0 immediately
        let value = store.state(|s| s.value).await;
        assert_eq!(value, 0);

        handle.wait().await;

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_handle_waits_for_every_effect() -> Result<(), StoreError> {
        let store = test_store();

        let mut handle = store.send(TestAction::ProduceSeveralEffects).await?;
        handle.wait().await;

        // Net result: +1 +1 -1 = 1
        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_delay_actions_are_broadcast() -> Result<(), StoreError> {
        let store = test_store();
        let mut actions = store.subscribe_actions();

        let _ = store.send(TestAction::ProduceDelayedAction).await?;

        let observed = tokio::time::timeout(Duration::from_secs(1), actions.recv()).await;
        assert!(matches!(observed, Ok(Ok(TestAction::Increment))));
        Ok(())
    }

    #[tokio::test]
    #[allow(clippy::panic)] // Tests are allowed to panic on failures
    async fn test_check_and_mutate_is_atomic_under_concurrency() {
        let store = test_store();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let _ = store.send(TestAction::ReserveIfBelow { limit: 3 }).await;
                })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                panic!("concurrent send task panicked: {e}");
            }
        }

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 3);
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() -> Result<(), StoreError> {
        let store = test_store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await?;
        handle.wait().await;

        // Store should still be functional after effect panic
        let _ = store.send(TestAction::Increment).await?;
        let value = store.state(|s| s.value).await;
        assert_eq!(value, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() -> Result<(), StoreError> {
        let store = test_store();

        store.shutdown(Duration::from_secs(1)).await?;

        let result = store.send(TestAction::Increment).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_pending_delay() -> Result<(), StoreError> {
        let store = test_store();

        let _ = store.send(TestAction::ProduceDelayedAction).await?;
        assert_eq!(store.pending_effects(), 1);

        store.shutdown(Duration::from_secs(1)).await?;
        assert_eq!(store.pending_effects(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_completed_handle() {
        let mut handle = EffectHandle::completed();
        assert!(handle.wait_with_timeout(Duration::from_millis(10)).await.is_ok());
    }
}
