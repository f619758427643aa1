//! State shared by the list-page controllers
//!
//! A list page keeps three versions of "what to show":
//!
//! - the raw filter inputs, which change on every keystroke
//! - the settled [`ListQuery`], which drives fetches
//! - the query last written to (or read from) the URL
//!
//! Inputs settle after a quiet interval; only then do they reach the query,
//! the URL and the API.

use backoffice_core::location::Query;

const PAGE: &str = "page";
const SEARCH: &str = "search";
const CATEGORY: &str = "category";

/// What a list page fetches: page plus settled filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Zero-based page
    pub page: u32,
    /// Settled free-text search
    pub search: String,
    /// Settled category filter
    pub category: String,
}

impl ListQuery {
    /// Read from a URL query; missing or malformed values fall back to defaults
    #[must_use]
    pub fn from_query(query: &Query) -> Self {
        Self {
            page: query.get_parsed(PAGE).unwrap_or(0),
            search: query.get(SEARCH).unwrap_or_default().to_string(),
            category: query.get(CATEGORY).unwrap_or_default().to_string(),
        }
    }

    /// URL form: defaults are omitted
    #[must_use]
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if self.page > 0 {
            query.set(PAGE, self.page.to_string());
        }
        if !self.search.is_empty() {
            query.set(SEARCH, self.search.clone());
        }
        if !self.category.is_empty() {
            query.set(CATEGORY, self.category.clone());
        }
        query
    }

    /// Whether any filter is set
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || !self.category.is_empty()
    }
}

/// Lifecycle of the list fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded
    Loaded,
    /// The last fetch failed
    Errored,
}

/// Controller state of a list page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPageState {
    /// Settled query
    pub query: ListQuery,
    /// Query as currently reflected in the URL
    pub url: ListQuery,
    /// Raw search input
    pub search_input: String,
    /// Raw category input
    pub category_input: String,
    /// Bumped on every search keystroke; only the latest timer settles
    pub search_generation: u64,
    /// Bumped on every category change; only the latest timer settles
    pub category_generation: u64,
    /// Sequence number of the latest fetch
    pub request_seq: u64,
    /// Fetch lifecycle
    pub status: ListStatus,
    /// The page is on screen
    pub mounted: bool,
}

impl ListPageState {
    /// Take over a query read from the URL, inputs included
    pub fn adopt(&mut self, query: ListQuery) {
        self.search_input.clone_from(&query.search);
        self.category_input.clone_from(&query.category);
        self.url = query.clone();
        self.query = query;
    }

    /// Start a fetch and return its sequence number
    pub fn begin_fetch(&mut self) -> u64 {
        self.request_seq += 1;
        self.status = ListStatus::Loading;
        self.request_seq
    }

    /// Whether a response with `seq` belongs to the latest fetch
    #[must_use]
    pub const fn is_current(&self, seq: u64) -> bool {
        self.mounted && seq == self.request_seq
    }

    /// URL query to write, if the settled query differs from the URL
    pub fn sync_url(&mut self) -> Option<Query> {
        if self.query == self.url {
            return None;
        }
        self.url = self.query.clone();
        Some(self.query.to_query())
    }

    /// Bump a generation counter and return the new value
    pub fn next_generation(counter: &mut u64) -> u64 {
        *counter += 1;
        *counter
    }
}
