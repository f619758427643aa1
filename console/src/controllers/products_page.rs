//! Products list page
//!
//! Reconciles the URL query, the debounced search and category inputs, the
//! products slice and the server. Also hosts the product form and the detail
//! drawer.

use super::list::{ListPageState, ListQuery, ListStatus};
use crate::environment::ConsoleEnvironment;
use crate::form::{FormDelegate, ProductFormAction, ProductFormReducer, ProductFormState};
use crate::route::Route;
use crate::slices::collection::CollectionAction;
use crate::slices::{ProductsReducer, ProductsSlice, dispatch};
use backoffice_client::{ApiError, Page, Product, Sort};
use backoffice_core::composition::reduce_scoped;
use backoffice_core::environment::Notification;
use backoffice_core::location::Query;
use backoffice_core::{Effect, Reducer, SmallVec, smallvec};
use std::sync::Arc;

/// State of the products page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductsState {
    /// Normalized products
    pub slice: ProductsSlice,
    /// Query, inputs and fetch lifecycle
    pub list: ListPageState,
    /// Create / edit dialog
    pub form: ProductFormState,
    /// Product whose deletion is in flight
    pub deleting: Option<i64>,
}

/// Actions of the products page
#[derive(Debug, Clone, PartialEq)]
pub enum ProductsPageAction {
    /// The page was opened with this URL query
    Mount(Query),
    /// The page was left
    Unmount,
    /// The URL changed under the page (back / forward)
    UrlChanged(Query),
    /// Go to a page
    SetPage(u32),
    /// Search input changed
    SearchChanged(String),
    /// Category input changed
    CategoryChanged(String),
    /// Search debounce timer fired
    SearchSettled(u64),
    /// Category debounce timer fired
    CategorySettled(u64),
    /// Refetch the current page
    Refresh,
    /// A list fetch finished
    Loaded {
        /// Sequence number of the fetch
        seq: u64,
        /// Outcome
        result: Result<Page<Product>, ApiError>,
    },
    /// Open the detail drawer
    ShowDetail(i64),
    /// The detail record arrived
    DetailLoaded(Result<Product, ApiError>),
    /// Close the detail drawer
    CloseDetail,
    /// Delete a product
    Delete(i64),
    /// A delete finished
    Deleted {
        /// Product id
        id: i64,
        /// Outcome
        result: Result<(), ApiError>,
    },
    /// Product form
    Form(ProductFormAction),
}

/// Reducer for [`ProductsState`]
#[derive(Debug, Clone, Default)]
pub struct ProductsPageReducer {
    slice: ProductsReducer,
    form: ProductFormReducer,
}

impl ProductsPageReducer {
    /// Create the reducer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fetch for the settled query
    fn fetch(&self, state: &mut ProductsState, env: &ConsoleEnvironment) -> Effect<ProductsPageAction> {
        let seq = state.list.begin_fetch();
        dispatch(&self.slice, &mut state.slice, CollectionAction::SetLoading);

        let api = Arc::clone(&env.api);
        let query = state.list.query.clone();
        let size = env.settings.page_size;
        tracing::debug!(seq, ?query, "Fetching products");

        Effect::future(async move {
            let result = if query.is_filtered() {
                api.search_products(query.search, query.category, query.page, size)
                    .await
            } else {
                api.list_products(query.page, size, Sort::products_default())
                    .await
            };
            Some(ProductsPageAction::Loaded { seq, result })
        })
    }

    /// Write the settled query to the URL if needed, then fetch
    fn sync_and_fetch(
        &self,
        state: &mut ProductsState,
        env: &ConsoleEnvironment,
    ) -> SmallVec<[Effect<ProductsPageAction>; 4]> {
        let mut effects = SmallVec::new();
        if let Some(query) = state.list.sync_url() {
            effects.push(env.replace_location(Route::Products.location().with_query_params(query)));
        }
        effects.push(self.fetch(state, env));
        effects
    }
}

impl Reducer for ProductsPageReducer {
    type State = ProductsState;
    type Action = ProductsPageAction;
    type Environment = ConsoleEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per page event
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ProductsPageAction::Mount(query) => {
                state.list.mounted = true;
                state.list.adopt(ListQuery::from_query(&query));
                state.slice.pagination.size = env.settings.page_size;
                smallvec![self.fetch(state, env)]
            },
            ProductsPageAction::Unmount => {
                state.list.mounted = false;
                state.list.status = ListStatus::Idle;
                state.form = ProductFormState::default();
                state.deleting = None;
                SmallVec::new()
            },
            ProductsPageAction::UrlChanged(query) => {
                let query = ListQuery::from_query(&query);
                if !state.list.mounted || query == state.list.url {
                    return SmallVec::new();
                }
                state.list.adopt(query);
                smallvec![self.fetch(state, env)]
            },
            ProductsPageAction::SetPage(page) => {
                if !state.list.mounted || page == state.list.query.page {
                    return SmallVec::new();
                }
                state.list.query.page = page;
                self.sync_and_fetch(state, env)
            },
            ProductsPageAction::SearchChanged(input) => {
                state.list.search_input = input;
                let generation = ListPageState::next_generation(&mut state.list.search_generation);
                smallvec![Effect::Delay {
                    duration: env.settings.debounce,
                    action: Box::new(ProductsPageAction::SearchSettled(generation)),
                }]
            },
            ProductsPageAction::CategoryChanged(input) => {
                state.list.category_input = input;
                let generation =
                    ListPageState::next_generation(&mut state.list.category_generation);
                smallvec![Effect::Delay {
                    duration: env.settings.debounce,
                    action: Box::new(ProductsPageAction::CategorySettled(generation)),
                }]
            },
            ProductsPageAction::SearchSettled(generation) => {
                let list = &mut state.list;
                if !list.mounted
                    || generation != list.search_generation
                    || list.search_input == list.query.search
                {
                    return SmallVec::new();
                }
                list.query.search.clone_from(&list.search_input);
                list.query.page = 0;
                self.sync_and_fetch(state, env)
            },
            ProductsPageAction::CategorySettled(generation) => {
                let list = &mut state.list;
                if !list.mounted
                    || generation != list.category_generation
                    || list.category_input == list.query.category
                {
                    return SmallVec::new();
                }
                list.query.category.clone_from(&list.category_input);
                list.query.page = 0;
                self.sync_and_fetch(state, env)
            },
            ProductsPageAction::Refresh => {
                if !state.list.mounted {
                    return SmallVec::new();
                }
                smallvec![self.fetch(state, env)]
            },
            ProductsPageAction::Loaded { seq, result } => {
                if !state.list.is_current(seq) {
                    tracing::debug!(seq, latest = state.list.request_seq, "Discarding stale products page");
                    return SmallVec::new();
                }
                match result {
                    Ok(page) => {
                        state.list.status = ListStatus::Loaded;
                        dispatch(&self.slice, &mut state.slice, CollectionAction::SetPage(page));
                        SmallVec::new()
                    },
                    Err(error) => {
                        tracing::warn!(%error, "Products fetch failed");
                        state.list.status = ListStatus::Errored;
                        let message = env.failure_message(&error);
                        dispatch(&self.slice, &mut state.slice, CollectionAction::SetError(message));
                        smallvec![env.notify_failure(&error)]
                    },
                }
            },
            ProductsPageAction::ShowDetail(id) => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(ProductsPageAction::DetailLoaded(api.get_product(id).await))
                })]
            },
            ProductsPageAction::DetailLoaded(Ok(product)) => {
                dispatch(&self.slice, &mut state.slice, CollectionAction::SetSelected(Some(product)));
                SmallVec::new()
            },
            ProductsPageAction::DetailLoaded(Err(error)) => {
                tracing::warn!(%error, "Product detail failed");
                smallvec![env.notify_failure(&error)]
            },
            ProductsPageAction::CloseDetail => {
                dispatch(&self.slice, &mut state.slice, CollectionAction::SetSelected(None));
                SmallVec::new()
            },
            ProductsPageAction::Delete(id) => {
                if let Some(busy) = state.deleting {
                    tracing::debug!(id, busy, "Delete rejected, another one is in flight");
                    return smallvec![env.notify(Notification::warning(env.t("common.busy")))];
                }
                state.deleting = Some(id);
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let result = api.delete_product(id).await;
                    Some(ProductsPageAction::Deleted { id, result })
                })]
            },
            ProductsPageAction::Deleted { id, result } => {
                state.deleting = None;
                if let Err(error) = result {
                    tracing::warn!(%error, id, "Product delete failed");
                    return smallvec![env.notify_failure(&error)];
                }

                let was_last_on_page = state.slice.items.len() == 1;
                dispatch(&self.slice, &mut state.slice, CollectionAction::Remove(id));

                let mut effects: SmallVec<[Effect<ProductsPageAction>; 4]> =
                    smallvec![env.notify(Notification::success(env.t("products.deleteSuccess")))];
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
            ProductsPageAction::Form(ProductFormAction::Delegate(FormDelegate::Completed {
                product,
                created,
            })) => {
                let patch = if created {
                    CollectionAction::Add(product)
                } else {
                    CollectionAction::Update(product)
                };
                dispatch(&self.slice, &mut state.slice, patch);
                if state.list.mounted {
                    smallvec![self.fetch(state, env)]
                } else {
                    SmallVec::new()
                }
            },
            ProductsPageAction::Form(action) => {
                reduce_scoped(&self.form, &mut state.form, action, env, ProductsPageAction::Form)
            },
        }
    }
}
