//! Dashboard summary
//!
//! Fetches the first hundred orders and products side by side and derives
//! the headline numbers from them. A failure leaves zeroed stats; it is
//! logged, not shown.

use crate::environment::ConsoleEnvironment;
use backoffice_client::{ApiError, Order, Page, Product, Sort};
use backoffice_core::{Effect, Reducer, SmallVec, smallvec};
use std::sync::Arc;

/// Records fetched per list for the summary
pub const SAMPLE_SIZE: u32 = 100;

/// Orders listed under "recent orders"
pub const RECENT_ORDERS: usize = 5;

/// Headline numbers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    /// Orders on the server
    pub total_orders: u64,
    /// Products on the server
    pub total_products: u64,
    /// Sum of order totals over the sampled orders
    pub total_revenue: f64,
    /// Newest orders
    pub recent_orders: Vec<Order>,
}

impl DashboardStats {
    /// Derive the stats from the sampled pages
    #[must_use]
    pub fn from_pages(orders: Page<Order>, products: &Page<Product>) -> Self {
        let total_revenue = orders.content.iter().map(|order| order.total_amount).sum();
        let mut recent_orders = orders.content;
        recent_orders.truncate(RECENT_ORDERS);

        Self {
            total_orders: orders.total_elements,
            total_products: products.total_elements,
            total_revenue,
            recent_orders,
        }
    }
}

/// Dashboard state
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    /// Stats are being fetched
    pub loading: bool,
    /// Latest stats
    pub stats: DashboardStats,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            loading: true,
            stats: DashboardStats::default(),
        }
    }
}

/// Actions of the dashboard
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    /// Fetch the stats
    Load,
    /// Both lists arrived, or one failed
    Loaded(Result<(Page<Order>, Page<Product>), ApiError>),
}

/// Reducer for [`DashboardState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardReducer;

impl Reducer for DashboardReducer {
    type State = DashboardState;
    type Action = DashboardAction;
    type Environment = ConsoleEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            DashboardAction::Load => {
                state.loading = true;
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = futures::future::try_join(
                        api.list_orders(0, SAMPLE_SIZE, Sort::orders_default()),
                        api.list_products(0, SAMPLE_SIZE, Sort::products_default()),
                    )
                    .await;
                    Some(DashboardAction::Loaded(result))
                })]
            },
            DashboardAction::Loaded(Ok((orders, products))) => {
                state.loading = false;
                state.stats = DashboardStats::from_pages(orders, &products);
                SmallVec::new()
            },
            DashboardAction::Loaded(Err(error)) => {
                tracing::warn!(%error, "Dashboard stats unavailable");
                state.loading = false;
                state.stats = DashboardStats::default();
                SmallVec::new()
            },
        }
    }
}
