//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request from the client.
    #[error("{0}")]
    BadRequest(String),

    /// The checkout did not complete.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Checkout(err) => checkout_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match &err {
        // A collaborator call failed; the order was not placed.
        CheckoutError::Step { step, .. } => {
            tracing::error!(step = step.as_str(), error = %err, "checkout rejected");
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
        CheckoutError::Total { .. } => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
    }
}
