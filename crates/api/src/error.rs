//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as
//! `{"error": <kind>, "message": <text>}`. Server errors are captured to
//! Sentry and answered with a generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::middleware::AccessError;
use crate::services::ServiceError;
use crate::services::auth::AuthError;
use crate::services::orders::OrderError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication or authorization failed.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Registration, login or credential check failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Order placement or status change failed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Catalog, cart, wishlist, feedback or account operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Malformed request body, path or query.
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

const INTERNAL_MESSAGE: &str = "Internal server error";

impl AppError {
    /// HTTP status and error kind reported to the client.
    #[must_use]
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Access(err) => access_kind(*err),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "InvalidCredentials"),
                AuthError::AccountAlreadyExists => (StatusCode::CONFLICT, "Conflict"),
                AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_)
                | AuthError::MissingField(_) => (StatusCode::BAD_REQUEST, "Validation"),
                AuthError::Repository(err) => repository_kind(err),
                AuthError::Token(_) | AuthError::PasswordHash => internal(),
            },
            Self::Order(err) => match err {
                OrderError::MissingShippingAddress => {
                    (StatusCode::BAD_REQUEST, "MissingShippingAddress")
                }
                OrderError::EmptyOrder => (StatusCode::BAD_REQUEST, "EmptyOrder"),
                OrderError::InvalidQuantity { .. } => (StatusCode::BAD_REQUEST, "InvalidQuantity"),
                OrderError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "ProductNotFound"),
                OrderError::InsufficientStock { .. } => {
                    (StatusCode::BAD_REQUEST, "InsufficientStock")
                }
                OrderError::InvalidStatus(_) => (StatusCode::BAD_REQUEST, "InvalidStatus"),
                OrderError::IllegalTransitionFromCancelled => {
                    (StatusCode::BAD_REQUEST, "IllegalTransitionFromCancelled")
                }
                OrderError::OrderNotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
                OrderError::Repository(err) => repository_kind(err),
            },
            Self::Service(err) => match err {
                ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation"),
                ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
                ServiceError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
                ServiceError::InsufficientStock { .. } => {
                    (StatusCode::BAD_REQUEST, "InsufficientStock")
                }
                ServiceError::Access(err) => access_kind(*err),
                ServiceError::Repository(err) => repository_kind(err),
            },
            Self::Database(err) => repository_kind(err),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "Validation"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            Self::Internal(_) => internal(),
        }
    }

    fn client_message(&self, status: StatusCode) -> String {
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            return INTERNAL_MESSAGE.to_string();
        }
        match self {
            Self::Database(err)
            | Self::Auth(AuthError::Repository(err))
            | Self::Order(OrderError::Repository(err))
            | Self::Service(ServiceError::Repository(err)) => match err {
                RepositoryError::Conflict(msg) => msg.clone(),
                _ => "Not found".to_string(),
            },
            Self::Auth(AuthError::InvalidCredentials) => "Invalid email or password".to_string(),
            Self::Auth(AuthError::InvalidEmail(_)) => "Invalid email address".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let message = self.client_message(status);
        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}

const fn access_kind(err: AccessError) -> (StatusCode, &'static str) {
    match err {
        AccessError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthenticated"),
        AccessError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
        AccessError::SelfModificationForbidden => {
            (StatusCode::FORBIDDEN, "SelfModificationForbidden")
        }
    }
}

const fn repository_kind(err: &RepositoryError) -> (StatusCode, &'static str) {
    match err {
        RepositoryError::NotFound => (StatusCode::NOT_FOUND, "NotFound"),
        RepositoryError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => internal(),
    }
}

const fn internal() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal")
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use shopsmart_core::{OrderId, ProductId};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    async fn body(err: AppError) -> serde_json::Value {
        let response = err.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_access_status_codes() {
        assert_eq!(
            get_status(AccessError::Unauthenticated.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(AccessError::Forbidden.into()), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AccessError::SelfModificationForbidden.into()),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_order_status_codes() {
        assert_eq!(
            get_status(OrderError::EmptyOrder.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(OrderError::ProductNotFound(ProductId::new(4)).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(OrderError::OrderNotFound(OrderId::new(4)).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(OrderError::IllegalTransitionFromCancelled.into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_service_and_auth_status_codes() {
        assert_eq!(
            get_status(ServiceError::Conflict("dup".to_string()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AuthError::AccountAlreadyExists.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(ServiceError::Access(AccessError::SelfModificationForbidden).into()),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_body_names_kind_and_message() {
        let json = body(
            OrderError::InsufficientStock {
                product: "Lamp".to_string(),
                available: 2,
                requested: 3,
            }
            .into(),
        )
        .await;

        assert_eq!(json["error"], "InsufficientStock");
        assert_eq!(
            json["message"],
            "insufficient stock for Lamp: available 2, requested 3"
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let json = body(AppError::Internal("pool exhausted at 10.0.0.3".to_string())).await;
        assert_eq!(json["error"], "Internal");
        assert_eq!(json["message"], INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_repository_conflict_surfaces_message() {
        let json = body(
            ServiceError::Repository(RepositoryError::Conflict(
                "product already in wishlist".to_string(),
            ))
            .into(),
        )
        .await;
        assert_eq!(json["error"], "Conflict");
        assert_eq!(json["message"], "product already in wishlist");
    }
}
