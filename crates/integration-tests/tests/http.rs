//! End-to-end tests through the full router.
//!
//! The offline tests exercise paths that are rejected before any query runs;
//! the rest need a database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use shopsmart_core::Role;
use shopsmart_integration_tests::{
    FIXTURE_PASSWORD, TestContext, get, json_request, offline_app, send,
};

// =============================================================================
// Offline
// =============================================================================

#[tokio::test]
async fn test_banner_and_liveness() {
    let response = offline_app().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ShopSmart API is running");

    let response = offline_app().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    for uri in ["/api/cart", "/api/wishlist", "/api/orders", "/api/orders/my", "/api/users"] {
        let (status, body) = send(offline_app(), get(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "Unauthenticated", "{uri}");
    }
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let (status, body) = send(offline_app(), get("/api/cart", Some("not.a-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthenticated");
}

#[tokio::test]
async fn test_placing_an_order_requires_a_token() {
    let body = json!({ "paymentMethod": "Card", "cartItems": [] });
    let (status, body) = send(offline_app(), json_request("POST", "/api/orders", None, &body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthenticated");
}

#[tokio::test]
async fn test_malformed_product_id_is_a_validation_error() {
    let (status, body) = send(offline_app(), get("/api/products/abc", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-abc-123")
        .body(Body::empty())
        .unwrap();
    let response = offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-abc-123");
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (SHOPSMART_TEST_DATABASE_URL)"]
async fn test_register_then_login() {
    let ctx = TestContext::new().await;
    let email = TestContext::unique_email("http-register");

    let registration = json!({
        "name": "Jane Shopper",
        "email": email,
        "password": FIXTURE_PASSWORD,
        "address": "1 Quay Road",
        "phone": "555-0199",
    });
    let (status, body) = send(
        ctx.app(),
        json_request("POST", "/api/auth/register", None, &registration),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Registration successful! Please log in.");

    let (status, body) = send(
        ctx.app(),
        json_request("POST", "/api/auth/register", None, &registration),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let credentials = json!({ "email": email, "password": FIXTURE_PASSWORD });
    let (status, body) = send(
        ctx.app(),
        json_request("POST", "/api/auth/login", None, &credentials),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "user");
    assert!(body.get("passwordHash").is_none());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(ctx.app(), get("/api/auth/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Jane Shopper");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SHOPSMART_TEST_DATABASE_URL)"]
async fn test_wrong_password_is_rejected() {
    let ctx = TestContext::new().await;
    let account = ctx.account(Role::User).await;

    let credentials = json!({ "email": account.email, "password": "wrong-password-1" });
    let (status, body) = send(
        ctx.app(),
        json_request("POST", "/api/auth/login", None, &credentials),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "InvalidCredentials");
}

// =============================================================================
// Access Control
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (SHOPSMART_TEST_DATABASE_URL)"]
async fn test_shoppers_cannot_reach_admin_routes() {
    let ctx = TestContext::new().await;
    let shopper = ctx.account(Role::User).await;
    let token = ctx.token(&shopper);

    for uri in ["/api/orders/admin", "/api/users", "/api/feedback"] {
        let (status, body) = send(ctx.app(), get(uri, Some(&token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["error"], "Forbidden", "{uri}");
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SHOPSMART_TEST_DATABASE_URL)"]
async fn test_admin_cannot_change_own_role() {
    let ctx = TestContext::new().await;
    let admin = ctx.account(Role::Admin).await;
    let token = ctx.token(&admin);

    let uri = format!("/api/users/{}/role", admin.id);
    let (status, body) = send(
        ctx.app(),
        json_request("PUT", &uri, Some(&token), &json!({ "role": "user" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "SelfModificationForbidden");

    let other = ctx.account(Role::User).await;
    let uri = format!("/api/users/{}/role", other.id);
    let (status, body) = send(
        ctx.app(),
        json_request("PUT", &uri, Some(&token), &json!({ "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (SHOPSMART_TEST_DATABASE_URL)"]
async fn test_place_order_and_cancel_over_http() {
    let ctx = TestContext::new().await;
    let shopper = ctx.account(Role::User).await;
    let admin = ctx.account(Role::Admin).await;
    let product = ctx.product(1000, 5).await;
    let shopper_token = ctx.token(&shopper);
    let admin_token = ctx.token(&admin);

    let order = json!({
        "paymentMethod": "Card",
        "cartItems": [{ "productId": product.id, "quantity": 3 }],
    });
    let (status, body) = send(
        ctx.app(),
        json_request("POST", "/api/orders", Some(&shopper_token), &order),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order placed successfully!");
    assert_eq!(body["order"]["status"], "Pending");
    assert_eq!(body["order"]["total"], "30.00");
    let order_id = body["order"]["id"].as_i64().unwrap();

    let (status, body) = send(
        ctx.app(),
        json_request("POST", "/api/orders", Some(&shopper_token), &order),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InsufficientStock");

    let uri = format!("/api/orders/admin/{order_id}/status");
    let (status, body) = send(
        ctx.app(),
        json_request("PUT", &uri, Some(&admin_token), &json!({ "status": "Cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Order {order_id} status updated to Cancelled")
    );
    assert_eq!(ctx.stock(product.id).await, 5);

    let (status, body) = send(
        ctx.app(),
        json_request("PUT", &uri, Some(&admin_token), &json!({ "status": "Shipped" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "IllegalTransitionFromCancelled");

    let (status, body) = send(ctx.app(), get("/api/orders/my", Some(&shopper_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}
