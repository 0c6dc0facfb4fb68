//! Feedback handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use shopsmart_core::{FeedbackId, ProductId};

use super::MessageResponse;
use super::products::FeedbackSubmitted;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{FeedbackWithAuthor, FeedbackWithRefs, SubmitFeedback};
use crate::services::FeedbackService;
use crate::state::AppState;

/// POST /api/feedback
#[instrument(skip(state, account, body), fields(account_id = %account.id))]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiJson(body): ApiJson<SubmitFeedback>,
) -> Result<(StatusCode, Json<FeedbackSubmitted>)> {
    let product_id = body
        .product_id
        .ok_or_else(|| AppError::BadRequest("productId is required".to_string()))?;

    let feedback = FeedbackService::new(state.pool())
        .submit(account.id, product_id, body.rating, &body.comment)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FeedbackSubmitted {
            message: "Feedback submitted successfully!",
            feedback,
        }),
    ))
}

/// GET /api/feedback, GET /api/feedback/admin
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<FeedbackWithRefs>>> {
    Ok(Json(FeedbackService::new(state.pool()).list_all().await?))
}

/// GET /api/feedback/product/{product_id}
pub async fn for_product(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<Json<Vec<FeedbackWithAuthor>>> {
    Ok(Json(
        FeedbackService::new(state.pool())
            .list_for_product(product_id)
            .await?,
    ))
}

/// DELETE /api/feedback/{id}
#[instrument(skip(state, admin), fields(actor = %admin.id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<FeedbackId>,
) -> Result<Json<MessageResponse>> {
    FeedbackService::new(state.pool()).delete(id).await?;
    Ok(MessageResponse::new("Feedback deleted"))
}
