//! # Back Office Runtime
//!
//! Store runtime for the back-office console.
//!
//! The [`Store`] owns the console state, applies actions through the root
//! reducer one at a time and executes the effects the reducer returns. Actions
//! produced by effects (API responses, debounce timers) are fed back into the
//! same store.
//!
//! ## Guarantees
//!
//! - Actions are applied under a single write lock: readers never observe a
//!   partially applied action.
//! - Host calls (`Effect::Run`) execute inline, in the order the reducer
//!   returned them, before the next action is applied.
//! - Async effects run as spawned tasks; `send()` returns once they are started.
//! - A panicking effect is isolated and never poisons the store.
//!
//! ## Example
//!
//! ```ignore
//! use backoffice_runtime::Store;
//!
//! let store = Store::new(ConsoleState::default(), ConsoleReducer::new(), environment);
//!
//! // Send an action and wait until every follow-up action has been applied
//! let mut handle = store.send_and_settle(ConsoleAction::Navigate(location)).await?;
//! handle.wait().await;
//!
//! let page = store.state(|s| s.products.pagination.current_page).await;
//! ```

use backoffice_core::{effect::Effect, reducer::Reducer};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a matching action
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Effect tracking mode - controls how effects are tracked for completion
#[derive(Debug, Clone)]
enum TrackingMode {
    /// Track only immediate effects spawned by this action
    Direct,

    /// Track effects transitively: actions fed back by effects get their own
    /// handles, which are waited on as children
    Cascading {
        children: Arc<Mutex<Vec<EffectHandle>>>,
    },
}

impl TrackingMode {
    fn cascading() -> Self {
        Self::Cascading {
            children: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] and [`Store::send_and_settle()`].
#[derive(Clone)]
pub struct EffectHandle {
    mode: TrackingMode,
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new(mode: TrackingMode) -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            mode: mode.clone(),
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            mode,
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
            mode: TrackingMode::Direct,
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all tracked effects to complete
    ///
    /// For handles returned by [`Store::send_and_settle()`] this also waits for
    /// every effect started by actions those effects produced.
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }

        if let TrackingMode::Cascading { children } = &self.mode {
            loop {
                let handles = {
                    let mut guard = match children.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    if guard.is_empty() {
                        break;
                    }
                    guard.drain(..).collect::<Vec<_>>()
                };

                for mut handle in handles {
                    Box::pin(handle.wait()).await;
                }
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("mode", &self.mode)
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    mode: TrackingMode,
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }

    /// Mode for actions fed back by an effect tracked by this context
    fn feedback_mode(&self) -> TrackingMode {
        match self.mode {
            TrackingMode::Direct => TrackingMode::Direct,
            TrackingMode::Cascading { .. } => TrackingMode::cascading(),
        }
    }

    fn adopt(&self, child: EffectHandle) {
        if let TrackingMode::Cascading { children } = &self.mode {
            let mut guard = match children.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.push(child);
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop, even on panic
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements the store-wide pending counter on drop
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for the console reducer
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicUsize, DecrementGuard, Duration, Effect, EffectHandle,
        EffectTracking, Ordering, PendingGuard, Reducer, RwLock, StoreError, TrackingMode,
    };
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
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
        /// Every action applied by the store, including those produced by effects
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Send + Clone + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 64)
        }

        /// Create a new Store with custom action broadcast capacity
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

        /// Access the injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Send an action to the store
        ///
        /// The reducer runs while holding the state write lock; the returned
        /// effects are started before this method returns. The handle tracks
        /// only the effects of this action, not those of follow-up actions.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            self.send_internal(action, TrackingMode::Direct).await
        }

        /// Send an action and track the whole cascade of follow-up actions
        ///
        /// Waiting on the returned handle resolves once every effect started
        /// by this action, and by any action those effects produced, is done.
        /// Pending debounce timers are part of the cascade.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        pub async fn send_and_settle(&self, action: A) -> Result<EffectHandle, StoreError> {
            self.send_internal(action, TrackingMode::cascading()).await
        }

        /// Send an action and wait for an action matching `predicate`
        ///
        /// Subscribes before sending so a fast effect cannot be missed.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action within `timeout`
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to every action applied by this store
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let loading = store.state(|s| s.products.loading).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Stop accepting actions and wait for running effects
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
        /// when `timeout` expires.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            match self.wait_until_idle(timeout).await {
                Ok(()) => {
                    tracing::info!("All effects completed, shutdown successful");
                    Ok(())
                },
                Err(_) => {
                    let pending = self.pending_effects();
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    Err(StoreError::ShutdownTimeout(pending))
                },
            }
        }

        /// Number of effects currently running, across all handles
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Wait until no effect is running anywhere in the store
        ///
        /// Unlike [`EffectHandle::wait`] this also covers actions sent by
        /// other producers, such as the unauthorized-signal listener.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Timeout`] if effects are still running when
        /// `timeout` expires.
        pub async fn wait_until_idle(&self, timeout: Duration) -> Result<(), StoreError> {
            let start = tokio::time::Instant::now();
            let poll_interval = Duration::from_millis(5);

            loop {
                if self.pending_effects() == 0 {
                    return Ok(());
                }
                if start.elapsed() >= timeout {
                    return Err(StoreError::Timeout);
                }
                tokio::time::sleep(poll_interval).await;
            }
        }

        async fn send_internal(
            &self,
            action: A,
            tracking_mode: TrackingMode,
        ) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!(?action, "Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let (handle, tracking) = EffectHandle::new(tracking_mode);

            let mut state = self.state.write().await;
            let effects = self
                .reducer
                .reduce(&mut state, action.clone(), &self.environment);
            tracing::trace!("Reducer returned {} effects", effects.len());

            let _ = self.action_broadcast.send(action);

            // host calls must land before another action is applied
            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }
            drop(state);

            Ok(handle)
        }

        /// Feed an action produced by an effect back into the store
        async fn feed_back(&self, action: A, tracking: &EffectTracking) {
            match self.send_internal(action, tracking.feedback_mode()).await {
                Ok(child) => tracking.adopt(child),
                Err(error) => tracing::debug!(%error, "Dropped action produced by effect"),
            }
        }

        fn spawn_tracked<F>(&self, tracking: &EffectTracking, task: F)
        where
            F: std::future::Future<Output = ()> + Send + 'static,
        {
            tracking.increment();
            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let guard = DecrementGuard(tracking.clone());
            let pending = PendingGuard(Arc::clone(&self.pending_effects));

            tokio::spawn(async move {
                let _guard = guard;
                let _pending = pending;
                task.await;
            });
        }

        #[allow(clippy::needless_pass_by_value)] // tracking is cloned into spawned tasks
        fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Run(call) => {
                    metrics::counter!("store.effects.executed", "type" => "run").increment(1);
                    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(call)).is_err() {
                        tracing::error!("Host call panicked");
                    }
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let store = self.clone();
                    let feedback = tracking.clone();

                    self.spawn_tracked(&tracking, async move {
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action");
                            store.feed_back(action, &feedback).await;
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    let store = self.clone();
                    let feedback = tracking.clone();

                    self.spawn_tracked(&tracking, async move {
                        tokio::time::sleep(duration).await;
                        tracing::trace!(?duration, "Effect::Delay elapsed");
                        store.feed_back(*action, &feedback).await;
                    });
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking.clone());
                    }
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                    let store = self.clone();
                    let parent = tracking.clone();

                    self.spawn_tracked(&tracking, async move {
                        for effect in effects {
                            let (mut step, step_tracking) =
                                EffectHandle::new(parent.feedback_mode());
                            store.execute_effect(effect, step_tracking);
                            step.wait().await;
                        }
                    });
                },
            }
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

pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use backoffice_core::{smallvec, SmallVec};

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        Decrement,
        ProduceEffect,
        ProduceDelayedAction,
        ProduceParallelEffects,
        ProduceSequentialEffects,
        ProduceChain,
        ProducePanickingEffect,
        Record(u32),
        RecordLater(u32),
        ProducePanickingHostCall,
    }

    #[derive(Debug, Clone, Default)]
    struct TestEnv {
        log: Arc<Mutex<Vec<u32>>>,
    }

    impl TestEnv {
        fn recorded(&self) -> Vec<u32> {
            self.log.lock().unwrap().clone()
        }
    }

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
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Record(n) => {
                    state.value = i32::try_from(n).unwrap();
                    let log = Arc::clone(&env.log);
                    smallvec![Effect::fire_and_forget(move || log.lock().unwrap().push(n))]
                },
                TestAction::RecordLater(n) => {
                    smallvec![Effect::future(async move { Some(TestAction::Record(n)) })]
                },
                #[allow(clippy::panic)] // Intentional panic for testing isolation
                TestAction::ProducePanickingHostCall => {
                    smallvec![Effect::fire_and_forget(|| panic!("Intentional panic in host call"))]
                },
                TestAction::Increment => {
                    state.value += 1;
                    SmallVec::new()
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    SmallVec::new()
                },
                TestAction::ProduceEffect => {
                    smallvec![Effect::future(async { Some(TestAction::Increment) })]
                },
                TestAction::ProduceDelayedAction => smallvec![Effect::Delay {
                    duration: Duration::from_millis(500),
                    action: Box::new(TestAction::Increment),
                }],
                TestAction::ProduceParallelEffects => smallvec![Effect::Parallel(vec![
                    Effect::future(async { Some(TestAction::Increment) }),
                    Effect::future(async { Some(TestAction::Increment) }),
                    Effect::future(async { Some(TestAction::Increment) }),
                ])],
                TestAction::ProduceSequentialEffects => smallvec![Effect::Sequential(vec![
                    Effect::future(async { Some(TestAction::Increment) }),
                    Effect::future(async { Some(TestAction::Increment) }),
                    Effect::future(async { Some(TestAction::Decrement) }),
                ])],
                TestAction::ProduceChain => {
                    // ProduceChain -> ProduceEffect -> Increment
                    smallvec![Effect::future(async { Some(TestAction::ProduceEffect) })]
                },
                #[allow(clippy::panic)] // Intentional panic for testing isolation
                TestAction::ProducePanickingEffect => smallvec![Effect::future(async {
                    panic!("Intentional panic in effect for testing");
                })],
            }
        }
    }

    fn store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv::default())
    }

    #[tokio::test]
    async fn test_send_action() {
        let store = store();

        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::Decrement).await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_future_feeds_back() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceEffect).await.unwrap();
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_effect_delay() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceDelayedAction).await.unwrap();
        assert_eq!(store.state(|s| s.value).await, 0);

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(store.state(|s| s.value).await, 0);

        handle.wait().await;
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_parallel() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceParallelEffects).await.unwrap();
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 3);
    }

    #[tokio::test]
    async fn test_effect_sequential() {
        let store = store();

        let mut handle = store.send(TestAction::ProduceSequentialEffects).await.unwrap();
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_settle_waits_for_whole_cascade() {
        let store = store();

        let mut handle = store.send_and_settle(TestAction::ProduceChain).await.unwrap();
        handle.wait().await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_panic_isolation() {
        let store = store();

        let mut handle = store.send(TestAction::ProducePanickingEffect).await.unwrap();
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();

        let _ = store.send(TestAction::Increment).await;
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_host_calls_run_before_send_returns() {
        let store = store();

        for n in 1..=5 {
            store.send(TestAction::Record(n)).await.unwrap();
            assert_eq!(store.environment().recorded().last(), Some(&n));
        }
        assert_eq!(store.environment().recorded(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_host_calls_follow_action_order_across_workers() {
        let store = store();

        for round in 0..50 {
            for n in 1..=8 {
                store.send(TestAction::RecordLater(round * 10 + n)).await.unwrap();
            }
            store.wait_until_idle(Duration::from_secs(5)).await.unwrap();

            let value = store.state(|s| s.value).await;
            let last = store.environment().recorded().last().copied();
            assert_eq!(last.map(|n| i32::try_from(n).unwrap()), Some(value), "round {round}");
        }
    }

    #[tokio::test]
    async fn test_host_call_panic_isolation() {
        let store = store();

        store.send(TestAction::ProducePanickingHostCall).await.unwrap();
        store.send(TestAction::Increment).await.unwrap();

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_actions() {
        let store = store();

        store.shutdown(Duration::from_secs(1)).await.unwrap();

        let result = store.send(TestAction::Increment).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    }

    #[tokio::test]
    async fn test_send_and_wait_for_effect_action() {
        let store = store();

        let action = store
            .send_and_wait_for(
                TestAction::ProduceEffect,
                |a| matches!(a, TestAction::Increment),
                Duration::from_secs(1),
            )
            .await
            .unwrap();

        assert!(matches!(action, TestAction::Increment));
    }
}
