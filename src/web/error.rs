use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::{ApiError, StorefrontError};

/// Handler return type.
pub type AppResult<T> = Result<T, StorefrontError>;

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            StorefrontError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            StorefrontError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            StorefrontError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION", self.to_string()),
            StorefrontError::SelectionIncomplete => (StatusCode::BAD_REQUEST, "SELECTION_INCOMPLETE", self.to_string()),
            StorefrontError::OutOfStock => (StatusCode::CONFLICT, "OUT_OF_STOCK", self.to_string()),
            StorefrontError::EmptyCart => (StatusCode::BAD_REQUEST, "EMPTY_CART", self.to_string()),
            StorefrontError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string()),
            StorefrontError::Upstream(err) => classify_upstream(err),
        };

        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

/// Client-side upstream failures pass through with their message; anything
/// else is logged and reported as a bad gateway.
fn classify_upstream(err: &ApiError) -> (StatusCode, &'static str, String) {
    match err {
        ApiError::Status { status, message } => match *status {
            400 | 422 => (StatusCode::BAD_REQUEST, "UPSTREAM_REJECTED", message.clone()),
            401 => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message.clone()),
            403 => (StatusCode::FORBIDDEN, "FORBIDDEN", message.clone()),
            404 => (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone()),
            409 => (StatusCode::CONFLICT, "CONFLICT", message.clone()),
            other => {
                tracing::error!(status = other, error = %message, "Upstream error");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", "The store service is unavailable, please try again".to_string())
            }
        },
        ApiError::Request(e) => {
            tracing::error!(error = %e, "Upstream request failed");
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", "The store service is unavailable, please try again".to_string())
        }
    }
}
