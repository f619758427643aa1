//! Wire types for the back-office REST API
//!
//! All bodies are camelCase JSON. Successful responses wrap their payload in
//! `{ "data": ... }`; list endpoints return a [`Page`] inside that envelope.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `{ "data": T }` wrapper around every successful response
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// The payload
    pub data: T,
}

/// One page of a server-side paginated list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// Records across all pages
    #[serde(default)]
    pub total_elements: u64,
    /// Number of pages
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based index of this page
    #[serde(default)]
    pub number: u32,
    /// Requested page size
    #[serde(default)]
    pub size: u32,
}

impl<T> Page<T> {
    /// An empty first page
    #[must_use]
    pub const fn empty(size: u32) -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            number: 0,
            size,
        }
    }
}

/// Role attached to an authenticated user (`ADMIN`, `CUSTOMER`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub String);

impl Role {
    /// The administrator role
    #[must_use]
    pub fn admin() -> Self {
        Self("ADMIN".to_string())
    }

    /// Whether this is the administrator role
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0 == "ADMIN"
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile of the signed-in operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name
    pub username: String,
    /// Contact address
    pub email: String,
    /// Authorization role
    pub role: Role,
}

/// `POST /auth/login` body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Plain-text password
    pub password: String,
}

/// `POST /auth/register` body
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Login name
    pub username: String,
    /// Contact address
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Successful login payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent calls
    pub token: String,
    /// Login name
    pub username: String,
    /// Contact address
    pub email: String,
    /// Authorization role
    pub role: Role,
}

impl AuthResponse {
    /// The profile half of the login payload
    #[must_use]
    pub fn user(&self) -> User {
        User {
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

/// A catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Unit price, always positive
    pub price: f64,
    /// Units in stock, never negative
    pub stock: i64,
    /// Free-form category label
    #[serde(default)]
    pub category: String,
    /// Whether the product is offered for sale
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// Body of `POST /products` and `PUT /products/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Display name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Units in stock
    pub stock: i64,
    /// Category label
    pub category: String,
    /// Whether the product is offered for sale
    pub is_active: bool,
}

impl ProductDraft {
    /// Attach a server identifier, producing the record the server would return
    #[must_use]
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            stock: self.stock,
            category: self.category,
            is_active: self.is_active,
        }
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation
    Pending,
    /// Accepted by an operator
    Confirmed,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Withdrawn
    Cancelled,
}

impl OrderStatus {
    /// Wire name (`PENDING`, `CONFIRMED`, ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Delivered and cancelled orders accept no further changes
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product name at the time of ordering
    pub product_name: String,
    /// Units ordered
    pub quantity: u32,
    /// Price per unit
    pub unit_price: f64,
    /// `quantity * unit_price`
    pub total_price: f64,
}

/// A customer order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-assigned identifier
    pub id: i64,
    /// Customer display name
    pub customer_name: String,
    /// Customer contact address
    pub customer_email: String,
    /// When the order was placed (server local time)
    pub order_date: NaiveDateTime,
    /// Sum of all line totals
    pub total_amount: f64,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Order lines
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
}

/// One line of a new order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    /// Product to order
    pub product_id: i64,
    /// Units to order
    pub quantity: u32,
}

/// Body of `POST /orders`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Customer display name
    pub customer_name: String,
    /// Customer contact address
    pub customer_email: String,
    /// Lines to order
    pub order_items: Vec<NewOrderItem>,
}

/// Body of `PUT /orders/{id}/status`
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct StatusUpdate {
    pub status: OrderStatus,
}

/// Sort direction for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// Query-string value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// `sortBy` / `sortDir` pair for list endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Field to sort by (`id`, `orderDate`, ...)
    pub by: String,
    /// Direction
    pub direction: SortDirection,
}

impl Sort {
    /// Sort by `field` in `direction`
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            by: field.into(),
            direction,
        }
    }

    /// Default product ordering: `id asc`
    #[must_use]
    pub fn products_default() -> Self {
        Self::new("id", SortDirection::Asc)
    }

    /// Default order ordering: newest first
    #[must_use]
    pub fn orders_default() -> Self {
        Self::new("orderDate", SortDirection::Desc)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;

    #[test]
    fn product_uses_camel_case_wire_names() {
        let json = r#"{"id":7,"name":"Green tea","price":4.5,"stock":12,"category":"Tea","isActive":false}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 7);
        assert!(!product.is_active);

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["isActive"], serde_json::json!(false));
    }

    #[test]
    fn page_tolerates_missing_content() {
        let page: Page<Product> =
            serde_json::from_str(r#"{"totalElements":0,"totalPages":0,"number":0,"size":10}"#)
                .unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.size, 10);
    }

    #[test]
    fn order_decodes_server_dates_and_status() {
        let json = r#"{
            "id": 3,
            "customerName": "Aziz",
            "customerEmail": "aziz@example.com",
            "orderDate": "2024-05-01T09:30:00",
            "totalAmount": 19.5,
            "status": "PENDING",
            "orderItems": [
                {"productName": "Mug", "quantity": 1, "unitPrice": 19.5, "totalPrice": 19.5}
            ]
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.order_items.len(), 1);
        assert_eq!(order.order_date.to_string(), "2024-05-01 09:30:00");
    }

    #[test]
    fn status_update_serializes_screaming_case() {
        let body = serde_json::to_string(&StatusUpdate {
            status: OrderStatus::Confirmed,
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"CONFIRMED"}"#);
    }
}
