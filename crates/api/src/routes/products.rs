//! Catalog handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use shopsmart_core::ProductId;

use super::MessageResponse;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{
    Feedback, NewProduct, Product, ProductPage, ProductQuery, ProductUpdate, SubmitFeedback,
};
use crate::services::{CatalogService, FeedbackService};
use crate::state::AppState;

/// Feedback submission response.
#[derive(Debug, Serialize)]
pub struct FeedbackSubmitted {
    pub message: &'static str,
    pub feedback: Feedback,
}

/// GET /api/products
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Json<ProductPage>> {
    Ok(Json(CatalogService::new(state.pool()).list(&query).await?))
}

/// GET /api/products/{id}
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(CatalogService::new(state.pool()).get(id).await?))
}

/// POST /api/products
#[instrument(skip(state, admin, product), fields(actor = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(product): ApiJson<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let created = CatalogService::new(state.pool()).create(&product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/products/{id}
#[instrument(skip(state, admin, update), fields(actor = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(update): ApiJson<ProductUpdate>,
) -> Result<Json<Product>> {
    Ok(Json(
        CatalogService::new(state.pool()).update(id, &update).await?,
    ))
}

/// DELETE /api/products/{id}
#[instrument(skip(state, admin), fields(actor = %admin.id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<Json<MessageResponse>> {
    CatalogService::new(state.pool()).delete(id).await?;
    Ok(MessageResponse::new("Product removed"))
}

/// POST /api/products/{id}/feedback
///
/// The product comes from the path; a `productId` in the body is ignored.
#[instrument(skip(state, account, body), fields(account_id = %account.id))]
pub async fn submit_feedback(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(body): ApiJson<SubmitFeedback>,
) -> Result<(StatusCode, Json<FeedbackSubmitted>)> {
    let feedback = FeedbackService::new(state.pool())
        .submit(account.id, id, body.rating, &body.comment)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FeedbackSubmitted {
            message: "Feedback submitted successfully!",
            feedback,
        }),
    ))
}
