//! Orders slice: a collection plus in-place status changes

use super::collection::{Collection, CollectionAction, CollectionReducer};
use backoffice_client::{Order, OrderStatus};
use backoffice_core::{Effect, Reducer, SmallVec};

/// Orders slice state
pub type OrdersSlice = Collection<Order>;

/// Actions of the orders slice
#[derive(Debug, Clone, PartialEq)]
pub enum OrdersAction {
    /// Shared collection behaviour
    Base(CollectionAction<Order>),
    /// An order moved to a new status
    UpdateStatus {
        /// Order id
        id: i64,
        /// New status
        status: OrderStatus,
    },
}

impl From<CollectionAction<Order>> for OrdersAction {
    fn from(action: CollectionAction<Order>) -> Self {
        Self::Base(action)
    }
}

/// Reducer for [`OrdersSlice`]
#[derive(Debug, Clone, Default)]
pub struct OrdersReducer {
    base: CollectionReducer<Order>,
}

impl OrdersReducer {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base: CollectionReducer::new(),
        }
    }
}

impl Reducer for OrdersReducer {
    type State = OrdersSlice;
    type Action = OrdersAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &(),
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            OrdersAction::Base(action) => {
                // the collection reducer is synchronous; nothing to lift
                let _ = self.base.reduce(state, action, env);
            },
            OrdersAction::UpdateStatus { id, status } => {
                let matching = state
                    .items
                    .iter_mut()
                    .chain(state.selected.as_mut())
                    .filter(|order| order.id == id);
                for order in matching {
                    order.status = status;
                }
            },
        }

        SmallVec::new()
    }
}
