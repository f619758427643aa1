//! Normalized store slices
//!
//! Three independently owned containers: the session, the products page and
//! the orders page. Each changes only through its own action vocabulary.

pub mod auth;
pub mod collection;
pub mod orders;

use backoffice_client::Product;
use backoffice_core::Reducer;
use collection::{Collection, CollectionAction, CollectionReducer};

/// Products slice state
pub type ProductsSlice = Collection<Product>;

/// Actions of the products slice
pub type ProductsAction = CollectionAction<Product>;

/// Reducer for [`ProductsSlice`]
pub type ProductsReducer = CollectionReducer<Product>;

/// Apply an action to a synchronous slice reducer
pub(crate) fn dispatch<R>(reducer: &R, state: &mut R::State, action: R::Action)
where
    R: Reducer<Environment = ()>,
{
    let effects = reducer.reduce(state, action, &());
    debug_assert!(effects.is_empty(), "slice reducers are synchronous");
}
