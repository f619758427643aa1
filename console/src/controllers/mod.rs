//! List-page controllers
//!
//! Each paginated view runs the same state machine,
//! `Idle → Loading → {Loaded, Errored}`, driven by the URL query, debounced
//! filter inputs and page changes. Responses carry the sequence number of the
//! fetch that produced them; anything but the latest is dropped.

pub mod list;
pub mod orders_page;
pub mod products_page;

pub use list::{ListPageState, ListQuery, ListStatus};
pub use orders_page::{
    OrdersPageAction, OrdersPageReducer, OrdersState, can_cancel, can_confirm, can_move,
};
pub use products_page::{ProductsPageAction, ProductsPageReducer, ProductsState};
