//! Request handling helpers.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Turn JSON bodies into typed requests with field-level errors
//!
//! The request ID is added as early as possible so every log line of a
//! request carries it.

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderValue, Request},
    Json,
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::{RelayError, RelayResult};

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of `request`, or `"unknown"` before the ID layer has run.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Unwrap an extracted JSON body, reporting malformed input as a client error.
pub fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> RelayResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| RelayError::InvalidRequest(rejection.body_text()))
}

/// A required string field; absent, empty, or whitespace-only is missing.
pub fn required(value: Option<String>, field: &'static str) -> RelayResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(RelayError::MissingField(field)),
    }
}
