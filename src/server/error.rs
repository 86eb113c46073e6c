//! Mapping from gateway errors to HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::memory::core::errors::GatewayError;

/// Error returned by route handlers, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Human-readable message.
    pub detail: String,
}

impl ApiError {
    /// Wrap `err`, prefixing server-side failures with `context`.
    ///
    /// Client errors keep their own message and are not logged as faults.
    #[must_use]
    pub fn with_context(context: &str, err: &GatewayError) -> Self {
        if err.is_client_error() {
            return Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                detail: err.to_string(),
            };
        }
        tracing::error!(error = %err, "{context}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("{context}: {err}"),
        }
    }

    /// A request body that is not valid JSON or lacks a required field.
    #[must_use]
    pub fn invalid_body(rejection: &JsonRejection) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
