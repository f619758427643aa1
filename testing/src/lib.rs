//! # Back Office Testing
//!
//! Testing utilities for the back-office console.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Mock implementations of the host environment traits
//! - [`backend::InMemoryBackend`], an in-memory back office with a call log
//! - Record fixtures
//!
//! ## Example
//!
//! ```ignore
//! use backoffice_testing::{backend::InMemoryBackend, fixtures::product};
//!
//! #[tokio::test(start_paused = true)]
//! async fn lists_first_page() {
//!     let backend = Arc::new(InMemoryBackend::new().with_products([product(1, "Tea")]));
//!     let console = test_console(backend.clone(), "/products");
//!
//!     console.start().await.unwrap();
//!     console.wait_until_idle().await.unwrap();
//!
//!     assert_eq!(backend.calls().len(), 1);
//! }
//! ```

pub mod backend;
pub mod mocks;
mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Record fixtures
pub mod fixtures {
    use backoffice_client::{Order, OrderItem, OrderStatus, Product};
    use chrono::{Duration, NaiveDateTime};

    /// An active product priced 10.0 with 5 units in the `General` category
    #[must_use]
    pub fn product(id: i64, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            price: 10.0,
            stock: 5,
            category: "General".to_string(),
            is_active: true,
        }
    }

    /// A pending single-line order placed `day` days after 2024-01-01
    #[must_use]
    pub fn order(id: i64, day: i64) -> Order {
        // 2024-01-01 is 19_723 days after the epoch
        let order_date = NaiveDateTime::default() + Duration::days(19_723 + day);
        Order {
            id,
            customer_name: format!("Customer {id}"),
            customer_email: format!("customer{id}@example.com"),
            order_date,
            total_amount: 25.0,
            status: OrderStatus::Pending,
            order_items: vec![OrderItem {
                product_name: "Tea".to_string(),
                quantity: 1,
                unit_price: 25.0,
                total_price: 25.0,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::order;

    #[test]
    fn order_dates_follow_day_offset() {
        assert_eq!(order(1, 0).order_date.to_string(), "2024-01-01 00:00:00");
        assert!(order(2, 3).order_date > order(1, 2).order_date);
    }
}
