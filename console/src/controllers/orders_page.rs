//! Orders list page
//!
//! Newest orders first, paged through the URL. Operators confirm, move and
//! cancel orders from here; each mutation patches the slice, reports the
//! outcome and reconciles with a refetch.
//!
//! Only pending orders can be confirmed. Pending orders can be cancelled by
//! anyone; an administrator can also cancel any order that is not final.

use super::list::{ListPageState, ListQuery, ListStatus};
use crate::environment::ConsoleEnvironment;
use crate::route::Route;
use crate::slices::collection::CollectionAction;
use crate::slices::dispatch;
use crate::slices::orders::{OrdersAction, OrdersReducer, OrdersSlice};
use backoffice_client::{ApiError, Order, OrderStatus, Page, Role, Sort};
use backoffice_core::environment::Notification;
use backoffice_core::location::Query;
use backoffice_core::{Effect, Reducer, SmallVec, smallvec};
use std::sync::Arc;

/// State of the orders page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersState {
    /// Normalized orders
    pub slice: OrdersSlice,
    /// Query and fetch lifecycle
    pub list: ListPageState,
    /// Order with a mutation in flight
    pub busy: Option<i64>,
    /// Role of the signed-in operator
    pub viewer: Option<Role>,
}

impl OrdersState {
    /// Order `id` as currently shown, in the list or the detail view
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&Order> {
        self.slice
            .items
            .iter()
            .chain(self.slice.selected.as_ref())
            .find(|order| order.id == id)
    }
}

/// Whether `order` can be confirmed
#[must_use]
pub fn can_confirm(order: &Order) -> bool {
    order.status == OrderStatus::Pending
}

/// Whether `viewer` can cancel `order`
#[must_use]
pub fn can_cancel(order: &Order, viewer: Option<&Role>) -> bool {
    order.status == OrderStatus::Pending
        || (viewer.is_some_and(Role::is_admin) && !order.status.is_final())
}

/// Whether `order` can be moved to `status`
#[must_use]
pub fn can_move(order: &Order, status: OrderStatus) -> bool {
    !order.status.is_final() && order.status != status
}

/// Actions of the orders page
#[derive(Debug, Clone, PartialEq)]
pub enum OrdersPageAction {
    /// The page was opened with this URL query
    Mount(Query),
    /// The page was left
    Unmount,
    /// The URL changed under the page (back / forward)
    UrlChanged(Query),
    /// Go to a page
    SetPage(u32),
    /// Refetch the current page
    Refresh,
    /// A list fetch finished
    Loaded {
        /// Sequence number of the fetch
        seq: u64,
        /// Outcome
        result: Result<Page<Order>, ApiError>,
    },
    /// Open the order detail
    ShowDetail(i64),
    /// The detail record arrived
    DetailLoaded(Result<Order, ApiError>),
    /// Close the order detail
    CloseDetail,
    /// Accept a pending order
    Confirm(i64),
    /// Move an order to `status`
    UpdateStatus {
        /// Order id
        id: i64,
        /// Target status
        status: OrderStatus,
    },
    /// A status change finished
    StatusUpdated {
        /// Order id
        id: i64,
        /// Target status
        status: OrderStatus,
        /// Outcome
        result: Result<(), ApiError>,
    },
    /// Cancel an order
    Cancel(i64),
    /// A cancellation finished
    Cancelled {
        /// Order id
        id: i64,
        /// Outcome
        result: Result<(), ApiError>,
    },
}

/// Reducer for [`OrdersState`]
#[derive(Debug, Clone, Default)]
pub struct OrdersPageReducer {
    slice: OrdersReducer,
}

impl OrdersPageReducer {
    /// Create the reducer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fetch(&self, state: &mut OrdersState, env: &ConsoleEnvironment) -> Effect<OrdersPageAction> {
        let seq = state.list.begin_fetch();
        dispatch(&self.slice, &mut state.slice, OrdersAction::Base(CollectionAction::SetLoading));

        let api = Arc::clone(&env.api);
        let page = state.list.query.page;
        let size = env.settings.page_size;
        tracing::debug!(seq, page, "Fetching orders");

        Effect::future(async move {
            let result = api.list_orders(page, size, Sort::orders_default()).await;
            Some(OrdersPageAction::Loaded { seq, result })
        })
    }

    fn sync_and_fetch(
        &self,
        state: &mut OrdersState,
        env: &ConsoleEnvironment,
    ) -> SmallVec<[Effect<OrdersPageAction>; 4]> {
        let mut effects = SmallVec::new();
        if let Some(query) = state.list.sync_url() {
            effects.push(env.replace_location(Route::Orders.location().with_query_params(query)));
        }
        effects.push(self.fetch(state, env));
        effects
    }

    /// Let `id` through if no other change is in flight and `allowed` holds
    fn admit(
        state: &mut OrdersState,
        id: i64,
        allowed: impl FnOnce(&Order, Option<&Role>) -> bool,
        env: &ConsoleEnvironment,
    ) -> Result<(), Effect<OrdersPageAction>> {
        if let Some(busy) = state.busy {
            tracing::debug!(id, busy, "Order change rejected, another one is in flight");
            return Err(env.notify(Notification::warning(env.t("common.busy"))));
        }
        if !state.find(id).is_some_and(|order| allowed(order, state.viewer.as_ref())) {
            tracing::debug!(id, "Order change not allowed in its current state");
            return Err(env.notify(Notification::warning(env.t("orders.actionNotAllowed"))));
        }
        state.busy = Some(id);
        Ok(())
    }

    fn update_status(
        state: &mut OrdersState,
        id: i64,
        status: OrderStatus,
        allowed: impl FnOnce(&Order, Option<&Role>) -> bool,
        env: &ConsoleEnvironment,
    ) -> SmallVec<[Effect<OrdersPageAction>; 4]> {
        if let Err(rejected) = Self::admit(state, id, allowed, env) {
            return smallvec![rejected];
        }
        let api = Arc::clone(&env.api);
        smallvec![Effect::future(async move {
            let result = api.update_order_status(id, status).await;
            Some(OrdersPageAction::StatusUpdated { id, status, result })
        })]
    }
}

impl Reducer for OrdersPageReducer {
    type State = OrdersState;
    type Action = OrdersPageAction;
    type Environment = ConsoleEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            OrdersPageAction::Mount(query) => {
                state.list.mounted = true;
                state.list.adopt(ListQuery::from_query(&query));
                state.slice.pagination.size = env.settings.page_size;
                smallvec![self.fetch(state, env)]
            },
            OrdersPageAction::Unmount => {
                state.list.mounted = false;
                state.list.status = ListStatus::Idle;
                state.busy = None;
                SmallVec::new()
            },
            OrdersPageAction::UrlChanged(query) => {
                let query = ListQuery::from_query(&query);
                if !state.list.mounted || query == state.list.url {
                    return SmallVec::new();
                }
                state.list.adopt(query);
                smallvec![self.fetch(state, env)]
            },
            OrdersPageAction::SetPage(page) => {
                if !state.list.mounted || page == state.list.query.page {
                    return SmallVec::new();
                }
                state.list.query.page = page;
                self.sync_and_fetch(state, env)
            },
            OrdersPageAction::Refresh => {
                if !state.list.mounted {
                    return SmallVec::new();
                }
                smallvec![self.fetch(state, env)]
            },
            OrdersPageAction::Loaded { seq, result } => {
                if !state.list.is_current(seq) {
                    tracing::debug!(seq, latest = state.list.request_seq, "Discarding stale orders page");
                    return SmallVec::new();
                }
                match result {
                    Ok(page) => {
                        state.list.status = ListStatus::Loaded;
                        dispatch(&self.slice, &mut state.slice, OrdersAction::Base(CollectionAction::SetPage(page)));
                        SmallVec::new()
                    },
                    Err(error) => {
                        tracing::warn!(%error, "Orders fetch failed");
                        state.list.status = ListStatus::Errored;
                        let message = env.failure_message(&error);
                        dispatch(&self.slice, &mut state.slice, OrdersAction::Base(CollectionAction::SetError(message)));
                        smallvec![env.notify_failure(&error)]
                    },
                }
            },
            OrdersPageAction::ShowDetail(id) => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(OrdersPageAction::DetailLoaded(api.get_order(id).await))
                })]
            },
            OrdersPageAction::DetailLoaded(Ok(order)) => {
                dispatch(&self.slice, &mut state.slice, OrdersAction::Base(CollectionAction::SetSelected(Some(order))));
                SmallVec::new()
            },
            OrdersPageAction::DetailLoaded(Err(error)) => {
                tracing::warn!(%error, "Order detail failed");
                smallvec![env.notify_failure(&error)]
            },
            OrdersPageAction::CloseDetail => {
                dispatch(&self.slice, &mut state.slice, OrdersAction::Base(CollectionAction::SetSelected(None)));
                SmallVec::new()
            },
            OrdersPageAction::Confirm(id) => Self::update_status(
                state,
                id,
                OrderStatus::Confirmed,
                |order, _| can_confirm(order),
                env,
            ),
            OrdersPageAction::UpdateStatus { id, status } => {
                Self::update_status(state, id, status, |order, _| can_move(order, status), env)
            },
            OrdersPageAction::StatusUpdated { id, status, result } => {
                state.busy = None;
                if let Err(error) = result {
                    tracing::warn!(%error, id, %status, "Order status update failed");
                    return smallvec![env.notify_failure(&error)];
                }

                dispatch(&self.slice, &mut state.slice, OrdersAction::UpdateStatus { id, status });
                let mut effects: SmallVec<[Effect<OrdersPageAction>; 4]> =
                    smallvec![env.notify(Notification::success(env.t("orders.statusUpdateSuccess")))];
                if state.list.mounted {
                    effects.push(self.fetch(state, env));
                }
                effects
            },
            OrdersPageAction::Cancel(id) => {
                if let Err(rejected) = Self::admit(state, id, can_cancel, env) {
                    return smallvec![rejected];
                }
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.cancel_order(id).await;
                    Some(OrdersPageAction::Cancelled { id, result })
                })]
            },
            OrdersPageAction::Cancelled { id, result } => {
                state.busy = None;
                if let Err(error) = result {
                    tracing::warn!(%error, id, "Order cancellation failed");
                    return smallvec![env.notify_failure(&error)];
                }

                let was_last_on_page = state.slice.items.len() == 1;
                dispatch(&self.slice, &mut state.slice, OrdersAction::Base(CollectionAction::Remove(id)));

                let mut effects: SmallVec<[Effect<OrdersPageAction>; 4]> =
                    smallvec![env.notify(Notification::success(env.t("orders.cancelSuccess")))];
                if !state.list.mounted {
                    return effects;
                }
                if was_last_on_page && state.list.query.page > 0 {
                    state.list.query.page -= 1;
                    effects.extend(self.sync_and_fetch(state, env));
                } else {
                    effects.push(self.fetch(state, env));
                }
                effects
            },
        }
    }
}
