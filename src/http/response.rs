//! Response shaping and error mapping.
//!
//! # Responsibilities
//! - Map [`RelayError`] to status codes and JSON bodies
//! - Log every failure once, at the handler boundary
//! - Record per-endpoint request metrics
//!
//! Body shapes follow the public contract: validation failures carry
//! `{error}`, existence conflicts and misses carry `{message}`, server-side
//! failures carry `{error, details}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Instant;

use crate::error::RelayError;
use crate::observability::metrics;

/// A failed request: what was being attempted, and why it failed.
#[derive(Debug)]
pub struct ApiError {
    context: &'static str,
    error: RelayError,
}

impl ApiError {
    pub fn new(context: &'static str, error: RelayError) -> Self {
        Self { context, error }
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            RelayError::MissingField(_)
            | RelayError::InvalidRequest(_)
            | RelayError::DuplicateResource(_) => StatusCode::BAD_REQUEST,
            RelayError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            RelayError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RelayError::InvalidCredential(_)
            | RelayError::TransactionFailed(_)
            | RelayError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.error.to_string();

        if status.is_server_error() {
            tracing::error!(context = self.context, error = %message, "Request failed");
        } else {
            tracing::warn!(context = self.context, error = %message, "Request rejected");
        }

        let body = match self.error {
            RelayError::DuplicateResource(_) | RelayError::ResourceNotFound(_) => {
                json!({ "message": message })
            }
            RelayError::MissingField(_)
            | RelayError::InvalidRequest(_)
            | RelayError::Unavailable(_) => json!({ "error": message }),
            _ => json!({ "error": self.context, "details": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Convert a handler result into a response and record it.
pub fn finish<T: IntoResponse>(
    endpoint: &'static str,
    start: Instant,
    result: Result<T, ApiError>,
) -> Response {
    let response = match result {
        Ok(body) => body.into_response(),
        Err(e) => e.into_response(),
    };
    metrics::record_request(endpoint, response.status().as_u16(), start);
    response
}
