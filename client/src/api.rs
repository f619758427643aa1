//! The back-office API as a trait
//!
//! Reducers only ever see `Arc<dyn BackOfficeApi>`. Production wires in
//! [`crate::HttpClient`]; tests use an in-memory backend.
//!
//! # Design
//!
//! Methods return explicit `Pin<Box<dyn Future>>` instead of `async fn` so the
//! trait stays dyn-compatible. Arguments are owned so a returned future only
//! borrows `self`.

use crate::error::ApiError;
use crate::models::{
    AuthResponse, LoginRequest, NewOrder, Order, OrderStatus, Page, Product, ProductDraft,
    RegisterRequest, Sort,
};
use crate::signal::Unauthorized;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::broadcast;

/// Boxed future returned by every API operation
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Remote operations the console performs
///
/// Every operation fails with [`ApiError::Unauthorized`] on a 401, after the
/// unauthorized signal has been emitted to [`BackOfficeApi::subscribe_unauthorized`]
/// listeners.
pub trait BackOfficeApi: Send + Sync {
    /// `POST /auth/register`
    fn register(&self, request: RegisterRequest) -> ApiFuture<'_, ()>;

    /// `POST /auth/login`
    fn login(&self, request: LoginRequest) -> ApiFuture<'_, AuthResponse>;

    /// `GET /products?page&size&sortBy&sortDir`
    fn list_products(&self, page: u32, size: u32, sort: Sort) -> ApiFuture<'_, Page<Product>>;

    /// `GET /products/{id}`
    fn get_product(&self, id: i64) -> ApiFuture<'_, Product>;

    /// `GET /products/search?name&category&page&size`
    fn search_products(
        &self,
        name: String,
        category: String,
        page: u32,
        size: u32,
    ) -> ApiFuture<'_, Page<Product>>;

    /// `POST /products`
    fn create_product(&self, draft: ProductDraft) -> ApiFuture<'_, Product>;

    /// `PUT /products/{id}`
    fn update_product(&self, id: i64, draft: ProductDraft) -> ApiFuture<'_, Product>;

    /// `DELETE /products/{id}`
    fn delete_product(&self, id: i64) -> ApiFuture<'_, ()>;

    /// `GET /orders?page&size&sortBy&sortDir`
    fn list_orders(&self, page: u32, size: u32, sort: Sort) -> ApiFuture<'_, Page<Order>>;

    /// `GET /orders/{id}`
    fn get_order(&self, id: i64) -> ApiFuture<'_, Order>;

    /// `GET /orders/customer/{email}`
    fn orders_by_customer(&self, email: String) -> ApiFuture<'_, Vec<Order>>;

    /// `POST /orders`
    fn create_order(&self, order: NewOrder) -> ApiFuture<'_, Order>;

    /// `PUT /orders/{id}/status`
    fn update_order_status(&self, id: i64, status: OrderStatus) -> ApiFuture<'_, ()>;

    /// `DELETE /orders/{id}`
    fn cancel_order(&self, id: i64) -> ApiFuture<'_, ()>;

    /// Listen for 401 responses from any operation
    fn subscribe_unauthorized(&self) -> broadcast::Receiver<Unauthorized>;
}
