//! reqwest implementation of [`BackOfficeApi`]

use crate::api::{ApiFuture, BackOfficeApi};
use crate::credentials::Credentials;
use crate::error::ApiError;
use crate::models::{
    AuthResponse, Envelope, LoginRequest, NewOrder, Order, OrderStatus, Page, Product,
    ProductDraft, RegisterRequest, Sort, StatusUpdate,
};
use crate::signal::{Unauthorized, UnauthorizedSignal};
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Default ceiling for a single request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body shape; only `message` is used
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the back-office REST API
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    credentials: Arc<Credentials>,
    unauthorized: UnauthorizedSignal,
}

impl HttpClient {
    /// Create a client for `base_url` with the default 10 s timeout
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the URL is invalid or the TLS
    /// backend cannot be initialised.
    pub fn new(base_url: &str, credentials: Arc<Credentials>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, credentials, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Configuration`] if the URL is invalid or the TLS
    /// backend cannot be initialised.
    pub fn with_timeout(
        base_url: &str,
        credentials: Arc<Credentials>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Configuration(format!("invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Configuration(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            credentials,
            unauthorized: UnauthorizedSignal::new(),
        })
    }

    /// Credentials shared with the session layer
    #[must_use]
    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Configuration(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.request(method, self.endpoint(segments)?))
    }

    /// Attach credentials, send, and classify the status
    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let mut builder = builder.header(ACCEPT_LANGUAGE, self.credentials.locale());
        if let Some(token) = self.credentials.token() {
            builder = builder.bearer_auth(token);
        }

        let request = builder
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(%method, %path, "Sending API request");

        let response = self.client.execute(request).await.map_err(|e| {
            let error = ApiError::from_transport(&e);
            tracing::warn!(%method, %path, %error, "API request failed without response");
            error
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);
        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(%method, %path, "API request rejected as unauthorized");
                self.unauthorized.emit();
                Err(ApiError::Unauthorized { message })
            },
            status => {
                tracing::debug!(%method, %path, status = status.as_u16(), ?message, "API error response");
                Err(ApiError::Request {
                    status: status.as_u16(),
                    message,
                })
            },
        }
    }

    /// Send and decode the `{data: T}` envelope
    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.dispatch(builder).await?;
        let envelope = response
            .json::<Envelope<T>>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }

    /// Send and ignore whatever body comes back
    async fn execute(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.dispatch(builder).await.map(|_| ())
    }
}

fn paging(page: u32, size: u32) -> [(&'static str, String); 2] {
    [("page", page.to_string()), ("size", size.to_string())]
}

fn sorting(sort: &Sort) -> [(&'static str, String); 2] {
    [
        ("sortBy", sort.by.clone()),
        ("sortDir", sort.direction.as_str().to_string()),
    ]
}

impl BackOfficeApi for HttpClient {
    fn register(&self, request: RegisterRequest) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let builder = self.request(Method::POST, &["auth", "register"])?.json(&request);
            self.execute(builder).await
        })
    }

    fn login(&self, request: LoginRequest) -> ApiFuture<'_, AuthResponse> {
        Box::pin(async move {
            let builder = self.request(Method::POST, &["auth", "login"])?.json(&request);
            self.fetch(builder).await
        })
    }

    fn list_products(&self, page: u32, size: u32, sort: Sort) -> ApiFuture<'_, Page<Product>> {
        Box::pin(async move {
            let builder = self
                .request(Method::GET, &["products"])?
                .query(&paging(page, size))
                .query(&sorting(&sort));
            self.fetch(builder).await
        })
    }

    fn get_product(&self, id: i64) -> ApiFuture<'_, Product> {
        Box::pin(async move {
            let id = id.to_string();
            self.fetch(self.request(Method::GET, &["products", &id])?).await
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
            let builder = self
                .request(Method::GET, &["products", "search"])?
                .query(&[("name", name), ("category", category)])
                .query(&paging(page, size));
            self.fetch(builder).await
        })
    }

    fn create_product(&self, draft: ProductDraft) -> ApiFuture<'_, Product> {
        Box::pin(async move {
            let builder = self.request(Method::POST, &["products"])?.json(&draft);
            self.fetch(builder).await
        })
    }

    fn update_product(&self, id: i64, draft: ProductDraft) -> ApiFuture<'_, Product> {
        Box::pin(async move {
            let id = id.to_string();
            let builder = self.request(Method::PUT, &["products", &id])?.json(&draft);
            self.fetch(builder).await
        })
    }

    fn delete_product(&self, id: i64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let id = id.to_string();
            self.execute(self.request(Method::DELETE, &["products", &id])?)
                .await
        })
    }

    fn list_orders(&self, page: u32, size: u32, sort: Sort) -> ApiFuture<'_, Page<Order>> {
        Box::pin(async move {
            let builder = self
                .request(Method::GET, &["orders"])?
                .query(&paging(page, size))
                .query(&sorting(&sort));
            self.fetch(builder).await
        })
    }

    fn get_order(&self, id: i64) -> ApiFuture<'_, Order> {
        Box::pin(async move {
            let id = id.to_string();
            self.fetch(self.request(Method::GET, &["orders", &id])?).await
        })
    }

    fn orders_by_customer(&self, email: String) -> ApiFuture<'_, Vec<Order>> {
        Box::pin(async move {
            let builder = self.request(Method::GET, &["orders", "customer", &email])?;
            self.fetch(builder).await
        })
    }

    fn create_order(&self, order: NewOrder) -> ApiFuture<'_, Order> {
        Box::pin(async move {
            let builder = self.request(Method::POST, &["orders"])?.json(&order);
            self.fetch(builder).await
        })
    }

    fn update_order_status(&self, id: i64, status: OrderStatus) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let id = id.to_string();
            let builder = self
                .request(Method::PUT, &["orders", &id, "status"])?
                .json(&StatusUpdate { status });
            self.execute(builder).await
        })
    }

    fn cancel_order(&self, id: i64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let id = id.to_string();
            self.execute(self.request(Method::DELETE, &["orders", &id])?)
                .await
        })
    }

    fn subscribe_unauthorized(&self) -> broadcast::Receiver<Unauthorized> {
        self.unauthorized.subscribe()
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
