//! Request extractors whose rejections render as JSON `AppError`s.
//!
//! The stock `Json`, `Path` and `Query` extractors reject with plain-text
//! bodies; these wrappers keep every client error in the API's error shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header::CONTENT_TYPE},
        routing::{get, post},
    };
    use serde::Deserialize;
    use shopsmart_core::ProductId;
    use tower::ServiceExt;

    use super::*;

    #[derive(Deserialize)]
    struct LineBody {
        quantity: i32,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/items",
                post(|ApiJson(body): ApiJson<LineBody>| async move { body.quantity.to_string() }),
            )
            .route(
                "/items/{id}",
                get(|ApiPath(id): ApiPath<ProductId>| async move { id.to_string() }),
            )
    }

    async fn error_kind(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        json["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_bad_json_is_a_validation_error() {
        let response = app()
            .oneshot(
                Request::post("/items")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"quantity\": \"many\"}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_kind(response).await, "Validation");
    }

    #[tokio::test]
    async fn test_bad_path_id_is_a_validation_error() {
        let response = app()
            .oneshot(Request::get("/items/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_kind(response).await, "Validation");
    }

    #[tokio::test]
    async fn test_valid_path_id_passes() {
        let response = app()
            .oneshot(Request::get("/items/7").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
