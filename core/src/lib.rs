//! # Back Office Core
//!
//! Core traits and types for the back-office console.
//!
//! The console is built from reducers: pure functions that apply an action to
//! a piece of state and describe the asynchronous work that should follow.
//!
//! ## Core Concepts
//!
//! - **State**: A slice of console state (session, a paginated collection, a page's query)
//! - **Action**: Every input a reducer understands (user intent, API responses, timers)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: A description of async work (HTTP calls, debounce timers), not its execution
//! - **Environment**: Host services injected through traits (navigation, storage, notifications)
//!
//! ## Example
//!
//! ```ignore
//! use backoffice_core::{Effect, Reducer, SmallVec};
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//! ```

pub use smallvec::{smallvec, SmallVec};

pub use effect::Effect;
pub use reducer::Reducer;

/// Reducer composition utilities
pub mod composition;

/// Host services injected into reducers
pub mod environment;

/// Navigable locations and query strings
pub mod location;

/// Reducer module - The core trait for console logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They own all state transitions; the runtime only executes the effects they return.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for console logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state slice this reducer operates on
    /// - `Action`: The action vocabulary this reducer processes
    /// - `Environment`: The injected host services this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Implementations update `state` in place and return descriptions of
        /// follow-up work. They must not perform I/O themselves.
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
/// Effects are values returned from reducers and executed by the store runtime.
/// An effect may produce a follow-up action that is fed back into the reducer.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Dispatch an action after a delay (debounce timers)
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

        /// Synchronous host call, run by the store in reducer order
        ///
        /// Host calls of one action run before the next action is applied.
        Run(Box<dyn FnOnce() + Send>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Run(_) => write!(f, "Effect::Run(<host call>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async block that produces an optional follow-up action
        #[must_use]
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Wrap a fire-and-forget host call that produces no action
        ///
        /// Used for host calls (notifications, navigation, storage writes)
        /// that must not run inside the reducer but must keep their order.
        #[must_use]
        pub fn fire_and_forget<F>(f: F) -> Effect<Action>
        where
            F: FnOnce() + Send + 'static,
        {
            Effect::Run(Box::new(f))
        }

        /// Lift an effect of a child action into an effect of a parent action
        ///
        /// This is how a parent reducer embeds a child reducer: the child's
        /// actions are wrapped (e.g. `ConsoleAction::Products`) before they are
        /// fed back into the store.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            F: Fn(Action) -> B + Clone + Send + Sync + 'static,
            Action: Send + 'static,
            B: Send + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map(f.clone())).collect())
                },
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map(f.clone())).collect())
                },
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
                Effect::Run(call) => Effect::Run(call),
            }
        }

        /// Whether this effect does nothing
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}
