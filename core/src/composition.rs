//! Reducer composition utilities
//!
//! The console state is a tree of independently owned slices. A parent
//! reducer hands each child action to the child reducer together with a
//! mutable borrow of the child's slice, then lifts the returned effects into
//! the parent's action vocabulary.
//!
//! # Example
//!
//! ```
//! use backoffice_core::{composition::reduce_scoped, Effect, Reducer, SmallVec};
//!
//! #[derive(Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut CounterState, action: CounterAction, _env: &()) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! #[derive(Default)]
//! struct AppState {
//!     counter: CounterState,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     Counter(CounterAction),
//! }
//!
//! let mut app = AppState::default();
//! let effects = reduce_scoped(&CounterReducer, &mut app.counter, CounterAction::Increment, &(), AppAction::Counter);
//! assert!(effects.is_empty());
//! assert_eq!(app.counter.count, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Run a child reducer on its slice and lift its effects into the parent's actions.
pub fn reduce_scoped<R, PA, F>(
    reducer: &R,
    state: &mut R::State,
    action: R::Action,
    env: &R::Environment,
    lift: F,
) -> SmallVec<[Effect<PA>; 4]>
where
    R: Reducer,
    R::Action: Send + 'static,
    PA: Send + 'static,
    F: Fn(R::Action) -> PA + Clone + Send + Sync + 'static,
{
    lift_effects(reducer.reduce(state, action, env), lift)
}

/// Lift a batch of child effects into the parent's action vocabulary.
///
/// `Effect::None` entries are dropped so callers can test for "no work" with
/// `is_empty()`.
pub fn lift_effects<CA, PA, F>(
    effects: SmallVec<[Effect<CA>; 4]>,
    lift: F,
) -> SmallVec<[Effect<PA>; 4]>
where
    CA: Send + 'static,
    PA: Send + 'static,
    F: Fn(CA) -> PA + Clone + Send + Sync + 'static,
{
    effects
        .into_iter()
        .filter(|effect| !effect.is_none())
        .map(|effect| effect.map(lift.clone()))
        .collect()
}
