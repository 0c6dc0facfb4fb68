//! Account administration against a live database.

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use shopsmart_api::models::OrderLineRequest;
use shopsmart_api::services::{CartService, FeedbackService, OrderService, WishlistService};
use shopsmart_core::{AccountId, Rating, Role};
use shopsmart_integration_tests::{TestContext, get, json_request, request, send};

async fn count(pool: &PgPool, table: &str, account: AccountId) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!(
        "SELECT count(*) FROM {table} WHERE account_id = $1"
    ))
    .bind(account)
    .fetch_one(pool)
    .await
    .unwrap()
}

// =============================================================================
// Deletion
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (SHOPSMART_TEST_DATABASE_URL)"]
async fn test_delete_account_removes_everything_it_owns() {
    let ctx = TestContext::new().await;
    let admin = ctx.account(Role::Admin).await;
    let shopper = ctx.account(Role::User).await;
    let shopper_token = ctx.token(&shopper);
    let product = ctx.product(1200, 10).await;

    OrderService::new(&ctx.pool)
        .place_order(
            shopper.id,
            "Card",
            &[OrderLineRequest {
                product_id: product.id,
                quantity: 1,
            }],
        )
        .await
        .unwrap();
    FeedbackService::new(&ctx.pool)
        .submit(shopper.id, product.id, Rating::new(5).unwrap(), "Great")
        .await
        .unwrap();
    CartService::new(&ctx.pool)
        .add(shopper.id, product.id, 2)
        .await
        .unwrap();
    WishlistService::new(&ctx.pool)
        .add(shopper.id, product.id)
        .await
        .unwrap();

    for table in ["orders", "feedback", "cart_item", "wishlist_item"] {
        assert_eq!(count(&ctx.pool, table, shopper.id).await, 1, "{table}");
    }

    let uri = format!("/api/users/{}", shopper.id);
    let (status, body) = send(ctx.app(), request("DELETE", &uri, Some(&ctx.token(&admin)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted");

    for table in ["orders", "feedback", "cart_item", "wishlist_item"] {
        assert_eq!(count(&ctx.pool, table, shopper.id).await, 0, "{table}");
    }

    let (status, body) = send(ctx.app(), get("/api/cart", Some(&shopper_token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthenticated");

    let (status, body) = send(ctx.app(), request("DELETE", &uri, Some(&ctx.token(&admin)))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SHOPSMART_TEST_DATABASE_URL)"]
async fn test_admin_cannot_delete_own_account() {
    let ctx = TestContext::new().await;
    let admin = ctx.account(Role::Admin).await;
    let token = ctx.token(&admin);

    let uri = format!("/api/users/{}", admin.id);
    let (status, body) = send(ctx.app(), request("DELETE", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "SelfModificationForbidden");

    let (status, _) = send(ctx.app(), get("/api/auth/profile", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SHOPSMART_TEST_DATABASE_URL)"]
async fn test_unknown_role_is_a_validation_error() {
    let ctx = TestContext::new().await;
    let admin = ctx.account(Role::Admin).await;
    let shopper = ctx.account(Role::User).await;

    let uri = format!("/api/users/{}/role", shopper.id);
    let (status, body) = send(
        ctx.app(),
        json_request("PUT", &uri, Some(&ctx.token(&admin)), &json!({ "role": "owner" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");
}
