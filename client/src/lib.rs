//! # Back Office Client
//!
//! Typed client for the back-office REST API: authentication, the product
//! catalog and orders.
//!
//! Every request carries `Accept-Language` and, when a session exists,
//! `Authorization: Bearer <token>`, both read from shared [`Credentials`].
//! A 401 from any call is reported on the [`UnauthorizedSignal`] before the
//! caller receives [`ApiError::Unauthorized`].
//!
//! ## Example
//!
//! ```no_run
//! use backoffice_client::{BackOfficeApi, Credentials, HttpClient, Sort};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), backoffice_client::ApiError> {
//! let credentials = Arc::new(Credentials::new("en"));
//! let client = HttpClient::new("http://localhost:8080/api", Arc::clone(&credentials))?;
//!
//! let page = client.list_products(0, 10, Sort::products_default()).await?;
//! println!("{} products", page.total_elements);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod credentials;
pub mod error;
pub mod http;
pub mod models;
pub mod signal;

pub use api::{ApiFuture, BackOfficeApi};
pub use credentials::Credentials;
pub use error::ApiError;
pub use http::HttpClient;
pub use models::{
    AuthResponse, LoginRequest, NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, Page,
    Product, ProductDraft, RegisterRequest, Role, Sort, SortDirection, User,
};
pub use signal::{Unauthorized, UnauthorizedSignal};
