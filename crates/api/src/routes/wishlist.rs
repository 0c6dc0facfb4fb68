//! Wishlist handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use shopsmart_core::ProductId;

use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAuth;
use crate::models::ProductSummary;
use crate::services::WishlistService;
use crate::state::AppState;

/// Wishlist add/remove request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistProduct {
    pub product_id: ProductId,
}

/// Wishlist response body.
#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub items: Vec<ProductSummary>,
}

/// GET /api/wishlist
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
) -> Result<Json<WishlistResponse>> {
    let items = WishlistService::new(state.pool()).get(account.id).await?;
    Ok(Json(WishlistResponse { items }))
}

/// POST /api/wishlist, POST /api/wishlist/add
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiJson(body): ApiJson<WishlistProduct>,
) -> Result<(StatusCode, Json<WishlistResponse>)> {
    let items = WishlistService::new(state.pool())
        .add(account.id, body.product_id)
        .await?;
    Ok((StatusCode::CREATED, Json(WishlistResponse { items })))
}

/// DELETE /api/wishlist/{product_id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<Json<WishlistResponse>> {
    let items = WishlistService::new(state.pool())
        .remove(account.id, product_id)
        .await?;
    Ok(Json(WishlistResponse { items }))
}

/// POST /api/wishlist/remove
pub async fn remove_by_body(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiJson(body): ApiJson<WishlistProduct>,
) -> Result<Json<WishlistResponse>> {
    let items = WishlistService::new(state.pool())
        .remove(account.id, body.product_id)
        .await?;
    Ok(Json(WishlistResponse { items }))
}
