//! Order handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use shopsmart_core::OrderId;

use super::MessageResponse;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{Order, OrderWithAccount, PlaceOrder, UpdateStatus};
use crate::services::OrderService;
use crate::state::AppState;

/// Order placement response.
#[derive(Debug, Serialize)]
pub struct OrderPlaced {
    pub message: &'static str,
    pub order: Order,
}

/// Status change response.
#[derive(Debug, Serialize)]
pub struct StatusUpdated {
    pub message: String,
    pub order: OrderWithAccount,
}

/// POST /api/orders
#[instrument(skip(state, account, body), fields(account_id = %account.id))]
pub async fn place(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiJson(body): ApiJson<PlaceOrder>,
) -> Result<(StatusCode, Json<OrderPlaced>)> {
    let order = OrderService::new(state.pool())
        .place_order(account.id, &body.payment_method, &body.cart_items)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderPlaced {
            message: "Order placed successfully!",
            order,
        }),
    ))
}

/// GET /api/orders and GET /api/orders/my
pub async fn mine(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(
        OrderService::new(state.pool()).list_mine(account.id).await?,
    ))
}

/// GET /api/orders/admin
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<OrderWithAccount>>> {
    Ok(Json(OrderService::new(state.pool()).list_all().await?))
}

/// PUT /api/orders/admin/{id}/status
#[instrument(skip(state, admin, body), fields(actor = %admin.id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(body): ApiJson<UpdateStatus>,
) -> Result<Json<StatusUpdated>> {
    let order = OrderService::new(state.pool())
        .transition_status(id, &body.status)
        .await?;

    Ok(Json(StatusUpdated {
        message: format!("Order {id} status updated to {}", order.order.status),
        order,
    }))
}

/// DELETE /api/orders/{id}
#[instrument(skip(state, admin), fields(actor = %admin.id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<Json<MessageResponse>> {
    OrderService::new(state.pool()).delete(id).await?;
    Ok(MessageResponse::new("Order deleted"))
}
