//! HTTP client tests against a mock back office

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use backoffice_client::{
    ApiError, BackOfficeApi, Credentials, HttpClient, LoginRequest, NewOrder, NewOrderItem,
    OrderStatus, ProductDraft, RegisterRequest, Sort, Unauthorized,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> (HttpClient, Arc<Credentials>) {
    let credentials = Arc::new(Credentials::new("en"));
    let client = HttpClient::new(&server.uri(), Arc::clone(&credentials)).unwrap();
    (client, credentials)
}

fn product_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "price": 9.99,
        "stock": 3,
        "category": "Tea",
        "isActive": true
    })
}

#[tokio::test]
async fn list_products_sends_paging_sort_and_headers() {
    let server = MockServer::start().await;
    let (client, credentials) = client_for(&server);
    credentials.set_token("secret-token");

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .and(query_param("size", "10"))
        .and(query_param("sortBy", "id"))
        .and(query_param("sortDir", "asc"))
        .and(header("authorization", "Bearer secret-token"))
        .and(header("accept-language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "content": [product_json(21, "Green tea")],
                "totalElements": 21,
                "totalPages": 3,
                "number": 2,
                "size": 10
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .list_products(2, 10, Sort::products_default())
        .await
        .unwrap();

    assert_eq!(page.number, 2);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.content[0].name, "Green tea");
}

#[tokio::test]
async fn search_products_targets_search_endpoint() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("name", "tea"))
        .and(query_param("category", ""))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"content": [], "totalElements": 0, "totalPages": 0, "number": 0, "size": 10}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .search_products("tea".to_string(), String::new(), 0, 10)
        .await
        .unwrap();
    assert!(page.content.is_empty());
}

#[tokio::test]
async fn requests_without_session_carry_no_bearer() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header_exists("accept-language"))
        .and(body_json(json!({"username": "admin", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"token": "t", "username": "admin", "email": "a@example.com", "role": "ADMIN"}
        })))
        .mount(&server)
        .await;

    let response = client
        .login(LoginRequest {
            username: "admin".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.token, "t");
    assert_eq!(response.user().role.0, "ADMIN");

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn unauthorized_emits_signal_and_fails() {
    let server = MockServer::start().await;
    let (client, credentials) = client_for(&server);
    credentials.set_token("expired");
    let mut signal = client.subscribe_unauthorized();

    Mock::given(method("GET"))
        .and(path("/orders/5"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_order(5).await;

    assert_eq!(result.unwrap_err(), ApiError::unauthorized());
    assert_eq!(signal.try_recv().unwrap(), Unauthorized);
    // the transport leaves the session alone
    assert_eq!(credentials.token().as_deref(), Some("expired"));
}

#[tokio::test]
async fn rejected_login_keeps_the_server_message() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})))
        .mount(&server)
        .await;

    let error = client
        .login(LoginRequest {
            username: "admin".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    assert!(error.is_unauthorized());
    assert_eq!(error.server_message(), Some("Bad credentials"));
}

#[tokio::test]
async fn error_body_message_is_extracted() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);
    let mut signal = client.subscribe_unauthorized();

    Mock::given(method("POST"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Price must be positive"})),
        )
        .mount(&server)
        .await;

    let error = client
        .create_product(ProductDraft {
            name: "Mug".to_string(),
            price: -1.0,
            stock: 1,
            category: "Kitchen".to_string(),
            is_active: true,
        })
        .await
        .unwrap_err();

    assert_eq!(error, ApiError::request(400, "Price must be positive"));
    assert!(signal.try_recv().is_err());
}

#[tokio::test]
async fn error_without_json_body_has_no_message() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("DELETE"))
        .and(path("/products/9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let error = client.delete_product(9).await.unwrap_err();
    assert_eq!(
        error,
        ApiError::Request {
            status: 500,
            message: None
        }
    );
}

#[tokio::test]
async fn status_update_sends_status_body() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("PUT"))
        .and(path("/orders/4/status"))
        .and(body_json(json!({"status": "CONFIRMED"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .update_order_status(4, OrderStatus::Confirmed)
        .await
        .unwrap();
}

#[tokio::test]
async fn customer_orders_are_fetched_by_email() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/orders/customer/aziz@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{
            "id": 1,
            "customerName": "Aziz",
            "customerEmail": "aziz@example.com",
            "orderDate": "2024-05-01T09:30:00",
            "totalAmount": 12.0,
            "status": "SHIPPED",
            "orderItems": []
        }]})))
        .mount(&server)
        .await;

    let orders = client
        .orders_by_customer("aziz@example.com".to_string())
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Shipped);
}

#[tokio::test]
async fn registration_posts_the_account() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "username": "dilnoza",
            "email": "dilnoza@example.com",
            "password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .register(RegisterRequest {
            username: "dilnoza".to_string(),
            email: "dilnoza@example.com".to_string(),
            password: "hunter22".to_string(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn orders_are_created_and_cancelled() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_json(json!({
            "customerName": "Aziz",
            "customerEmail": "aziz@example.com",
            "orderItems": [{"productId": 3, "quantity": 2}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {
            "id": 7,
            "customerName": "Aziz",
            "customerEmail": "aziz@example.com",
            "orderDate": "2024-05-01T09:30:00",
            "totalAmount": 19.98,
            "status": "PENDING",
            "orderItems": [{
                "productName": "Green tea",
                "quantity": 2,
                "unitPrice": 9.99,
                "totalPrice": 19.98
            }]
        }})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/orders/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let order = client
        .create_order(NewOrder {
            customer_name: "Aziz".to_string(),
            customer_email: "aziz@example.com".to_string(),
            order_items: vec![NewOrderItem {
                product_id: 3,
                quantity: 2,
            }],
        })
        .await
        .unwrap();
    assert_eq!(order.id, 7);
    assert_eq!(order.status, OrderStatus::Pending);

    client.cancel_order(order.id).await.unwrap();
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/products/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let error = client.get_product(1).await.unwrap_err();
    assert!(matches!(error, ApiError::Decode(_)));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    let credentials = Arc::new(Credentials::default());
    let client =
        HttpClient::with_timeout(&server.uri(), credentials, Duration::from_millis(100)).unwrap();

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let error = client
        .list_orders(0, 10, Sort::orders_default())
        .await
        .unwrap_err();
    assert_eq!(error, ApiError::Timeout);
}
