//! In-memory back office implementing [`BackOfficeApi`]
//!
//! Behaves like the real REST service closely enough for console tests:
//! server-side paging, search by name and category, and id assignment. Every
//! call is logged, failures can be queued, and per-call latency can be set to
//! reproduce out-of-order responses under a paused clock.

use backoffice_client::{
    ApiError, ApiFuture, AuthResponse, BackOfficeApi, LoginRequest, NewOrder, Order, OrderItem,
    OrderStatus, Page, Product, ProductDraft, RegisterRequest, Role, Sort, SortDirection,
    Unauthorized, UnauthorizedSignal,
};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;

/// One recorded API call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    /// `register`
    Register {
        /// Login name
        username: String,
    },
    /// `login`
    Login {
        /// Login name
        username: String,
    },
    /// `list_products`
    ListProducts {
        /// Page index
        page: u32,
        /// Page size
        size: u32,
        /// Sort order
        sort: Sort,
    },
    /// `get_product`
    GetProduct(i64),
    /// `search_products`
    SearchProducts {
        /// Name filter
        name: String,
        /// Category filter
        category: String,
        /// Page index
        page: u32,
        /// Page size
        size: u32,
    },
    /// `create_product`
    CreateProduct(ProductDraft),
    /// `update_product`
    UpdateProduct(i64, ProductDraft),
    /// `delete_product`
    DeleteProduct(i64),
    /// `list_orders`
    ListOrders {
        /// Page index
        page: u32,
        /// Page size
        size: u32,
        /// Sort order
        sort: Sort,
    },
    /// `get_order`
    GetOrder(i64),
    /// `orders_by_customer`
    OrdersByCustomer(String),
    /// `create_order`
    CreateOrder(NewOrder),
    /// `update_order_status`
    UpdateOrderStatus(i64, OrderStatus),
    /// `cancel_order`
    CancelOrder(i64),
}

impl ApiCall {
    /// Whether this call fetched a product list (plain or search)
    #[must_use]
    pub const fn is_product_fetch(&self) -> bool {
        matches!(self, Self::ListProducts { .. } | Self::SearchProducts { .. })
    }

    /// Whether this call fetched the order list
    #[must_use]
    pub const fn is_order_fetch(&self) -> bool {
        matches!(self, Self::ListOrders { .. })
    }
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    email: String,
    role: Role,
}

#[derive(Debug, Default)]
struct BackendState {
    products: Vec<Product>,
    orders: Vec<Order>,
    accounts: Vec<(String, Account)>,
    next_id: i64,
    calls: Vec<ApiCall>,
    failures: VecDeque<ApiError>,
    latencies: VecDeque<Duration>,
}

/// In-memory back office
///
/// # Example
///
/// ```
/// use backoffice_testing::backend::InMemoryBackend;
/// use backoffice_testing::fixtures::product;
///
/// let backend = InMemoryBackend::new().with_products((1..=3).map(|id| product(id, "Tea")));
/// assert_eq!(backend.product_count(), 3);
/// ```
#[derive(Debug)]
pub struct InMemoryBackend {
    state: Mutex<BackendState>,
    unauthorized: UnauthorizedSignal,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BackendState {
                next_id: 1,
                ..BackendState::default()
            }),
            unauthorized: UnauthorizedSignal::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed products; ids are kept and the id counter moves past them
    #[must_use]
    pub fn with_products(self, products: impl IntoIterator<Item = Product>) -> Self {
        {
            let mut state = self.lock();
            for product in products {
                state.next_id = state.next_id.max(product.id + 1);
                state.products.push(product);
            }
        }
        self
    }

    /// Seed orders
    #[must_use]
    pub fn with_orders(self, orders: impl IntoIterator<Item = Order>) -> Self {
        {
            let mut state = self.lock();
            for order in orders {
                state.next_id = state.next_id.max(order.id + 1);
                state.orders.push(order);
            }
        }
        self
    }

    /// Register an account that `login` accepts
    #[must_use]
    pub fn with_account(self, username: &str, password: &str, role: Role) -> Self {
        self.lock().accounts.push((
            username.to_string(),
            Account {
                password: password.to_string(),
                email: format!("{username}@example.com"),
                role,
            },
        ));
        self
    }

    /// Fail the next call with `error`
    ///
    /// Queued failures are consumed in order, one per call. An
    /// [`ApiError::Unauthorized`] failure also emits the unauthorized signal,
    /// as the HTTP client does.
    pub fn fail_next(&self, error: ApiError) {
        self.lock().failures.push_back(error);
    }

    /// Delay the next call by `latency` (consumed in order, one per call)
    pub fn delay_next(&self, latency: Duration) {
        self.lock().latencies.push_back(latency);
    }

    /// Every call made so far
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Calls matching `predicate`
    #[must_use]
    pub fn calls_matching(&self, predicate: impl Fn(&ApiCall) -> bool) -> Vec<ApiCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| predicate(call))
            .cloned()
            .collect()
    }

    /// Number of stored products
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.lock().products.len()
    }

    /// Stored order by id
    #[must_use]
    pub fn order(&self, id: i64) -> Option<Order> {
        self.lock().orders.iter().find(|o| o.id == id).cloned()
    }

    /// Record the call, then apply queued latency and failure
    async fn enter(&self, call: ApiCall) -> Result<(), ApiError> {
        let (latency, failure) = {
            let mut state = self.lock();
            state.calls.push(call);
            (state.latencies.pop_front(), state.failures.pop_front())
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match failure {
            Some(error) => {
                if error.is_unauthorized() {
                    self.unauthorized.emit();
                }
                Err(error)
            },
            None => Ok(()),
        }
    }

    fn next_id(state: &mut BackendState) -> i64 {
        let id = state.next_id;
        state.next_id += 1;
        id
    }
}

fn not_found(what: &str, id: impl std::fmt::Display) -> ApiError {
    ApiError::request(404, format!("{what} {id} not found"))
}

fn paginate<T: Clone>(items: &[T], page: u32, size: u32) -> Page<T> {
    let total = items.len();
    let size_usize = size.max(1) as usize;
    let total_pages = u32::try_from(total.div_ceil(size_usize)).unwrap_or(u32::MAX);
    let start = (page as usize).saturating_mul(size_usize).min(total);
    let end = (start + size_usize).min(total);

    Page {
        content: items[start..end].to_vec(),
        total_elements: total as u64,
        total_pages,
        number: page,
        size,
    }
}

impl BackOfficeApi for InMemoryBackend {
    fn register(&self, request: RegisterRequest) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.enter(ApiCall::Register {
                username: request.username.clone(),
            })
            .await?;
            let mut state = self.lock();
            if state.accounts.iter().any(|(name, _)| *name == request.username) {
                return Err(ApiError::request(409, "Username already exists"));
            }
            state.accounts.push((
                request.username,
                Account {
                    password: request.password,
                    email: request.email,
                    role: Role("CUSTOMER".to_string()),
                },
            ));
            Ok(())
        })
    }

    fn login(&self, request: LoginRequest) -> ApiFuture<'_, AuthResponse> {
        Box::pin(async move {
            self.enter(ApiCall::Login {
                username: request.username.clone(),
            })
            .await?;
            let state = self.lock();
            state
                .accounts
                .iter()
                .find(|(name, account)| *name == request.username && account.password == request.password)
                .map(|(name, account)| AuthResponse {
                    token: format!("token-{name}"),
                    username: name.clone(),
                    email: account.email.clone(),
                    role: account.role.clone(),
                })
                .ok_or_else(|| ApiError::request(400, "Invalid username or password"))
        })
    }

    fn list_products(&self, page: u32, size: u32, sort: Sort) -> ApiFuture<'_, Page<Product>> {
        Box::pin(async move {
            self.enter(ApiCall::ListProducts {
                page,
                size,
                sort: sort.clone(),
            })
            .await?;
            let mut products = self.lock().products.clone();
            products.sort_by_key(|p| p.id);
            if sort.direction == SortDirection::Desc {
                products.reverse();
            }
            Ok(paginate(&products, page, size))
        })
    }

    fn get_product(&self, id: i64) -> ApiFuture<'_, Product> {
        Box::pin(async move {
            self.enter(ApiCall::GetProduct(id)).await?;
            self.lock()
                .products
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or_else(|| not_found("Product", id))
        })
    }

    fn search_products(
        &self,
        name: String,
        category: String,
        page: u32,
        size: u32,
    ) -> ApiFuture<'_, Page<Product>> {
        Box::pin(async move {
            self.enter(ApiCall::SearchProducts {
                name: name.clone(),
                category: category.clone(),
                page,
                size,
            })
            .await?;
            let needle = name.to_lowercase();
            let mut matches: Vec<Product> = self
                .lock()
                .products
                .iter()
                .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
                .filter(|p| category.is_empty() || p.category.eq_ignore_ascii_case(&category))
                .cloned()
                .collect();
            matches.sort_by_key(|p| p.id);
            Ok(paginate(&matches, page, size))
        })
    }

    fn create_product(&self, draft: ProductDraft) -> ApiFuture<'_, Product> {
        Box::pin(async move {
            self.enter(ApiCall::CreateProduct(draft.clone())).await?;
            let mut state = self.lock();
            let id = Self::next_id(&mut state);
            let product = draft.into_product(id);
            state.products.push(product.clone());
            Ok(product)
        })
    }

    fn update_product(&self, id: i64, draft: ProductDraft) -> ApiFuture<'_, Product> {
        Box::pin(async move {
            self.enter(ApiCall::UpdateProduct(id, draft.clone())).await?;
            let mut state = self.lock();
            let slot = state
                .products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| not_found("Product", id))?;
            *slot = draft.into_product(id);
            Ok(slot.clone())
        })
    }

    fn delete_product(&self, id: i64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.enter(ApiCall::DeleteProduct(id)).await?;
            let mut state = self.lock();
            let before = state.products.len();
            state.products.retain(|p| p.id != id);
            if state.products.len() == before {
                return Err(not_found("Product", id));
            }
            Ok(())
        })
    }

    fn list_orders(&self, page: u32, size: u32, sort: Sort) -> ApiFuture<'_, Page<Order>> {
        Box::pin(async move {
            self.enter(ApiCall::ListOrders {
                page,
                size,
                sort: sort.clone(),
            })
            .await?;
            let mut orders = self.lock().orders.clone();
            orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
            if sort.direction == SortDirection::Asc {
                orders.reverse();
            }
            Ok(paginate(&orders, page, size))
        })
    }

    fn get_order(&self, id: i64) -> ApiFuture<'_, Order> {
        Box::pin(async move {
            self.enter(ApiCall::GetOrder(id)).await?;
            self.order(id).ok_or_else(|| not_found("Order", id))
        })
    }

    fn orders_by_customer(&self, email: String) -> ApiFuture<'_, Vec<Order>> {
        Box::pin(async move {
            self.enter(ApiCall::OrdersByCustomer(email.clone())).await?;
            Ok(self
                .lock()
                .orders
                .iter()
                .filter(|o| o.customer_email == email)
                .cloned()
                .collect())
        })
    }

    fn create_order(&self, order: NewOrder) -> ApiFuture<'_, Order> {
        Box::pin(async move {
            self.enter(ApiCall::CreateOrder(order.clone())).await?;
            let mut state = self.lock();
            let mut items = Vec::with_capacity(order.order_items.len());
            for line in &order.order_items {
                let product = state
                    .products
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .ok_or_else(|| not_found("Product", line.product_id))?;
                items.push(OrderItem {
                    product_name: product.name.clone(),
                    quantity: line.quantity,
                    unit_price: product.price,
                    total_price: product.price * f64::from(line.quantity),
                });
            }
            let id = Self::next_id(&mut state);
            let created = Order {
                id,
                customer_name: order.customer_name,
                customer_email: order.customer_email,
                order_date: Utc::now().naive_utc(),
                total_amount: items.iter().map(|i| i.total_price).sum(),
                status: OrderStatus::Pending,
                order_items: items,
            };
            state.orders.push(created.clone());
            Ok(created)
        })
    }

    fn update_order_status(&self, id: i64, status: OrderStatus) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.enter(ApiCall::UpdateOrderStatus(id, status)).await?;
            let mut state = self.lock();
            let order = state
                .orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or_else(|| not_found("Order", id))?;
            order.status = status;
            Ok(())
        })
    }

    fn cancel_order(&self, id: i64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.enter(ApiCall::CancelOrder(id)).await?;
            let mut state = self.lock();
            let before = state.orders.len();
            state.orders.retain(|o| o.id != id);
            if state.orders.len() == before {
                return Err(not_found("Order", id));
            }
            Ok(())
        })
    }

    fn subscribe_unauthorized(&self) -> broadcast::Receiver<Unauthorized> {
        self.unauthorized.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use crate::fixtures::{order, product};

    #[tokio::test]
    async fn pages_products_by_id() {
        let backend = InMemoryBackend::new().with_products((1..=25).map(|id| product(id, "Item")));

        let page = backend
            .list_products(2, 10, Sort::products_default())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.content.len(), 5);
        assert_eq!(page.content[0].id, 21);
    }

    #[tokio::test]
    async fn search_filters_by_name_and_category() {
        let mut mug = product(2, "Blue mug");
        mug.category = "Kitchen".to_string();
        let backend = InMemoryBackend::new().with_products([product(1, "Green tea"), mug]);

        let page = backend
            .search_products("MUG".to_string(), "kitchen".to_string(), 0, 10)
            .await
            .unwrap();

        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].id, 2);
    }

    #[tokio::test]
    async fn unauthorized_failure_emits_signal() {
        let backend = InMemoryBackend::new();
        let mut rx = backend.subscribe_unauthorized();
        backend.fail_next(ApiError::unauthorized());

        let result = backend.get_order(1).await;

        assert_eq!(result.unwrap_err(), ApiError::unauthorized());
        assert!(rx.try_recv().is_ok());
        assert_eq!(backend.calls(), vec![ApiCall::GetOrder(1)]);
    }

    #[tokio::test]
    async fn orders_are_newest_first() {
        let backend = InMemoryBackend::new().with_orders([order(1, 1), order(2, 3), order(3, 2)]);

        let page = backend
            .list_orders(0, 10, Sort::orders_default())
            .await
            .unwrap();

        let ids: Vec<i64> = page.content.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
