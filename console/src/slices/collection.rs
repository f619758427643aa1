//! Paginated collection slice
//!
//! Shared by products and orders. Holds the most recently completed page for
//! the current query; a fetch in flight only flips `loading`.

use backoffice_client::{Order, Page, Product};
use backoffice_core::{Effect, Reducer, SmallVec};
use std::marker::PhantomData;

/// A record with a server-assigned identifier
pub trait Record: Clone + Send + 'static {
    /// Identifier
    fn record_id(&self) -> i64;
}

impl Record for Product {
    fn record_id(&self) -> i64 {
        self.id
    }
}

impl Record for Order {
    fn record_id(&self) -> i64 {
        self.id
    }
}

/// Server-side paging metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationMeta {
    /// Records across all pages
    pub total_elements: u64,
    /// Number of pages
    pub total_pages: u32,
    /// Zero-based page held in `items`
    pub current_page: u32,
    /// Records per page
    pub size: u32,
}

impl PaginationMeta {
    /// Metadata for an empty collection
    #[must_use]
    pub const fn empty(size: u32) -> Self {
        Self {
            total_elements: 0,
            total_pages: 0,
            current_page: 0,
            size,
        }
    }
}

/// One page of records plus request status
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    /// Records of the current page, in server order
    pub items: Vec<T>,
    /// Record shown by the detail view
    pub selected: Option<T>,
    /// A fetch is in flight
    pub loading: bool,
    /// Failure of the last fetch; cleared when the next one starts
    pub error: Option<String>,
    /// Paging metadata of `items`
    pub pagination: PaginationMeta,
}

impl<T> Collection<T> {
    /// Empty collection with the given page size
    #[must_use]
    pub const fn with_page_size(size: u32) -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
            pagination: PaginationMeta::empty(size),
        }
    }

    /// Whether the current page is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::with_page_size(10)
    }
}

/// Everything that can happen to a collection
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionAction<T> {
    /// A fetch started
    SetLoading,
    /// A fetch completed: replace the page
    SetPage(Page<T>),
    /// Show (or clear) a single record
    SetSelected(Option<T>),
    /// A fetch failed
    SetError(String),
    /// A record was created
    Add(T),
    /// A record was changed
    Update(T),
    /// A record was deleted
    Remove(i64),
    /// Dismiss the error banner
    ClearError,
}

/// Reducer for [`Collection`]
///
/// Purely synchronous: it never returns effects.
#[derive(Debug)]
pub struct CollectionReducer<T>(PhantomData<fn() -> T>);

impl<T> CollectionReducer<T> {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for CollectionReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CollectionReducer<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: Record> Reducer for CollectionReducer<T> {
    type State = Collection<T>;
    type Action = CollectionAction<T>;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &(),
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CollectionAction::SetLoading => {
                state.loading = true;
                state.error = None;
            },
            CollectionAction::SetPage(page) => {
                let size = if page.size == 0 {
                    state.pagination.size
                } else {
                    page.size
                };
                let mut items = page.content;
                items.truncate(size as usize);

                state.items = items;
                state.pagination = PaginationMeta {
                    total_elements: page.total_elements,
                    total_pages: page.total_pages,
                    current_page: page.number.min(page.total_pages.saturating_sub(1)),
                    size,
                };
                state.loading = false;
                state.error = None;
            },
            CollectionAction::SetSelected(record) => {
                state.selected = record;
            },
            CollectionAction::SetError(message) => {
                state.loading = false;
                state.error = Some(message);
            },
            CollectionAction::Add(record) => {
                // a full page stays as the server returned it until the refetch
                if state.items.len() < state.pagination.size as usize {
                    state.items.push(record);
                }
                state.pagination.total_elements += 1;
            },
            CollectionAction::Update(record) => {
                let id = record.record_id();
                if let Some(slot) = state.items.iter_mut().find(|r| r.record_id() == id) {
                    *slot = record.clone();
                }
                if state.selected.as_ref().is_some_and(|r| r.record_id() == id) {
                    state.selected = Some(record);
                }
            },
            CollectionAction::Remove(id) => {
                let before = state.items.len();
                state.items.retain(|r| r.record_id() != id);
                if state.items.len() < before {
                    state.pagination.total_elements =
                        state.pagination.total_elements.saturating_sub(1);
                }
                if state.selected.as_ref().is_some_and(|r| r.record_id() == id) {
                    state.selected = None;
                }
            },
            CollectionAction::ClearError => {
                state.error = None;
            },
        }

        SmallVec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_testing::ReducerTest;
    use backoffice_testing::assertions::assert_no_effects;
    use backoffice_testing::fixtures::product;

    fn page(ids: std::ops::RangeInclusive<i64>, number: u32, total_pages: u32) -> Page<Product> {
        let content: Vec<Product> = ids.map(|id| product(id, "Tea")).collect();
        Page {
            total_elements: u64::from(total_pages) * 3,
            content,
            total_pages,
            number,
            size: 3,
        }
    }

    #[test]
    fn set_page_replaces_items_and_clears_status() {
        ReducerTest::new(CollectionReducer::new())
            .with_env(())
            .given_state(Collection::with_page_size(3))
            .given_action(CollectionAction::SetLoading)
            .given_action(CollectionAction::SetError("boom".to_string()))
            .given_action(CollectionAction::SetLoading)
            .when_action(CollectionAction::SetPage(page(4..=6, 1, 2)))
            .then_state(|state| {
                assert_eq!(state.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![4, 5, 6]);
                assert_eq!(state.pagination.current_page, 1);
                assert!(!state.loading);
                assert_eq!(state.error, None);
            })
            .then_effects(|effects| assert_no_effects(effects))
            .run();
    }

    #[test]
    fn set_page_keeps_invariants_on_odd_server_replies() {
        let mut oversized = page(1..=5, 9, 2);
        oversized.size = 3;

        ReducerTest::new(CollectionReducer::new())
            .with_env(())
            .given_state(Collection::with_page_size(3))
            .when_action(CollectionAction::SetPage(oversized))
            .then_state(|state| {
                assert_eq!(state.items.len(), 3);
                assert_eq!(state.pagination.current_page, 1);
            })
            .run();
    }

    #[test]
    fn loading_keeps_the_previous_items() {
        ReducerTest::new(CollectionReducer::new())
            .with_env(())
            .given_state(Collection::with_page_size(3))
            .given_action(CollectionAction::SetPage(page(1..=3, 0, 1)))
            .when_action(CollectionAction::SetLoading)
            .then_state(|state| {
                assert!(state.loading);
                assert_eq!(state.items.len(), 3);
            })
            .run();
    }

    #[test]
    fn add_respects_page_size() {
        ReducerTest::new(CollectionReducer::new())
            .with_env(())
            .given_state(Collection::with_page_size(3))
            .given_action(CollectionAction::SetPage(page(1..=3, 0, 1)))
            .when_action(CollectionAction::Add(product(99, "New")))
            .then_state(|state| {
                assert_eq!(state.items.len(), 3);
                assert!(state.items.iter().all(|p| p.id != 99));
                assert_eq!(state.pagination.total_elements, 4);
            })
            .run();
    }

    #[test]
    fn update_and_remove_touch_the_selection() {
        let mut renamed = product(2, "Renamed");
        renamed.price = 12.5;

        ReducerTest::new(CollectionReducer::new())
            .with_env(())
            .given_state(Collection::with_page_size(3))
            .given_action(CollectionAction::SetPage(page(1..=3, 0, 1)))
            .given_action(CollectionAction::SetSelected(Some(product(2, "Tea"))))
            .when_action(CollectionAction::Update(renamed))
            .then_state(|state| {
                assert_eq!(state.items[1].name, "Renamed");
                assert_eq!(state.selected.as_ref().map(|p| p.price), Some(12.5));
            })
            .run();

        ReducerTest::new(CollectionReducer::new())
            .with_env(())
            .given_state(Collection::with_page_size(3))
            .given_action(CollectionAction::SetPage(page(1..=3, 0, 1)))
            .given_action(CollectionAction::SetSelected(Some(product(2, "Tea"))))
            .when_action(CollectionAction::Remove(2))
            .then_state(|state| {
                assert_eq!(state.items.len(), 2);
                assert_eq!(state.selected, None);
                assert_eq!(state.pagination.total_elements, 2);
            })
            .run();
    }
}
