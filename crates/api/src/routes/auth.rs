//! Registration, login and profile handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::MessageResponse;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAuth;
use crate::models::{Account, ProfileUpdate};
use crate::services::AuthService;
use crate::services::auth::Registration;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response: the profile plus a bearer token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub account: Account,
    pub token: String,
}

/// Password re-check request body.
#[derive(Debug, Deserialize)]
pub struct VerifyPasswordRequest {
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/register
#[instrument(skip(state, registration), fields(email = %registration.email))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(registration): ApiJson<Registration>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    AuthService::new(state.pool(), state.tokens())
        .register(&registration)
        .await?;

    Ok((
        StatusCode::CREATED,
        MessageResponse::new("Registration successful! Please log in."),
    ))
}

/// POST /api/auth/login
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (account, token) = AuthService::new(state.pool(), state.tokens())
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse { account, token }))
}

/// POST /api/auth/verify-password
#[instrument(skip(state, account, request), fields(account_id = %account.id))]
pub async fn verify_password(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiJson(request): ApiJson<VerifyPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::new(state.pool(), state.tokens())
        .verify_password(&account, &request.password)
        .await?;

    Ok(MessageResponse::new("Password verified successfully."))
}

/// GET /api/auth/profile
pub async fn profile(RequireAuth(account): RequireAuth) -> Json<Account> {
    Json(account)
}

/// PUT /api/auth/profile
#[instrument(skip(state, account, update), fields(account_id = %account.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(account): RequireAuth,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<Account>> {
    let updated = AuthService::new(state.pool(), state.tokens())
        .update_profile(&account, &update)
        .await?;

    Ok(Json(updated))
}
