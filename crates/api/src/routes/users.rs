//! Account administration handlers. Every route requires an administrator.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopsmart_core::AccountId;

use super::MessageResponse;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdmin;
use crate::models::{Account, AccountDetails, AccountFeedback, CartEntry, ProductSummary};
use crate::services::AccountService;
use crate::state::AppState;

/// Role change request body.
#[derive(Debug, Deserialize)]
pub struct ChangeRole {
    pub role: String,
}

/// Role change response.
#[derive(Debug, Serialize)]
pub struct RoleChanged {
    pub message: &'static str,
    pub user: Account,
}

/// GET /api/users
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<AccountDetails>>> {
    let accounts = AccountService::new(state.pool()).list_with_details().await?;
    Ok(Json(accounts))
}

/// GET /api/users/{id}/cart
pub async fn cart(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath(id): ApiPath<AccountId>,
) -> Result<Json<Vec<CartEntry>>> {
    Ok(Json(AccountService::new(state.pool()).cart(id).await?))
}

/// GET /api/users/{id}/wishlist
pub async fn wishlist(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath(id): ApiPath<AccountId>,
) -> Result<Json<Vec<ProductSummary>>> {
    Ok(Json(AccountService::new(state.pool()).wishlist(id).await?))
}

/// GET /api/users/{id}/feedback
pub async fn feedback(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    ApiPath(id): ApiPath<AccountId>,
) -> Result<Json<Vec<AccountFeedback>>> {
    Ok(Json(AccountService::new(state.pool()).feedback(id).await?))
}

/// PUT /api/users/{id}/role
#[instrument(skip(state, admin, body), fields(actor = %admin.id))]
pub async fn change_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<AccountId>,
    ApiJson(body): ApiJson<ChangeRole>,
) -> Result<Json<RoleChanged>> {
    let user = AccountService::new(state.pool())
        .change_role(&admin, id, &body.role)
        .await?;

    Ok(Json(RoleChanged {
        message: "User role updated",
        user,
    }))
}

/// DELETE /api/users/{id}
#[instrument(skip(state, admin), fields(actor = %admin.id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<AccountId>,
) -> Result<Json<MessageResponse>> {
    AccountService::new(state.pool()).delete(&admin, id).await?;
    Ok(MessageResponse::new("User deleted"))
}
