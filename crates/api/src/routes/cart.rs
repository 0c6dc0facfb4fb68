//! Cart handlers. Every route acts on the authenticated account's cart.

use axum::{Json, extract::State};
use serde::Serialize;

use shopsmart_core::ProductId;

use super::MessageResponse;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::models::{AddToCart, CartEntry, CartLineUpdate, CartProduct, SetQuantity};
use crate::services::CartService;
use crate::state::AppState;

/// Cart response body.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl CartResponse {
    fn items(items: Vec<CartEntry>) -> Json<Self> {
        Json(Self {
            items,
            message: None,
        })
    }

    fn removed(items: Vec<CartEntry>) -> Json<Self> {
        Json(Self {
            items,
            message: Some("Item removed from cart."),
        })
    }
}

/// GET /api/cart
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
) -> Result<Json<CartResponse>> {
    let items = CartService::new(state.pool()).get(account.id).await?;
    Ok(CartResponse::items(items))
}

/// POST /api/cart
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiJson(body): ApiJson<AddToCart>,
) -> Result<Json<CartResponse>> {
    let items = CartService::new(state.pool())
        .add(account.id, body.product_id, body.quantity)
        .await?;
    Ok(CartResponse::items(items))
}

/// PUT /api/cart/{product_id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiPath(product_id): ApiPath<ProductId>,
    ApiJson(body): ApiJson<SetQuantity>,
) -> Result<Json<CartResponse>> {
    let items = CartService::new(state.pool())
        .set_quantity(account.id, product_id, body.quantity)
        .await?;
    Ok(CartResponse::items(items))
}

/// DELETE /api/cart/{product_id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<Json<CartResponse>> {
    let items = CartService::new(state.pool())
        .remove(account.id, product_id)
        .await?;
    Ok(CartResponse::removed(items))
}

/// POST /api/cart/add
///
/// Adds a single unit.
pub async fn add_one(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiJson(body): ApiJson<CartProduct>,
) -> Result<Json<CartResponse>> {
    let items = CartService::new(state.pool())
        .add(account.id, body.product_id, 1)
        .await?;
    Ok(CartResponse::items(items))
}

/// POST /api/cart/update
///
/// Unlike `PUT /api/cart/{product_id}`, zero is rejected rather than removing the line.
pub async fn update_line(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiJson(body): ApiJson<CartLineUpdate>,
) -> Result<Json<CartResponse>> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "productId and a positive quantity are required".to_string(),
        ));
    }

    let items = CartService::new(state.pool())
        .set_quantity(account.id, body.product_id, body.quantity)
        .await?;
    Ok(CartResponse::items(items))
}

/// POST /api/cart/remove
pub async fn remove_line(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiJson(body): ApiJson<CartProduct>,
) -> Result<Json<CartResponse>> {
    let items = CartService::new(state.pool())
        .remove(account.id, body.product_id)
        .await?;
    Ok(CartResponse::removed(items))
}

/// DELETE /api/cart/clear
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
) -> Result<Json<MessageResponse>> {
    CartService::new(state.pool()).clear(account.id).await?;
    Ok(MessageResponse::new("Cart cleared."))
}
