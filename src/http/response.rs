//! Error responses.
//!
//! # Responsibilities
//! - Standard error envelope returned for every rejected or failed request
//! - Map [`ApiError`] variants to status codes
//! - Mark error responses so the logging middleware reports them as failures
//!
//! # Design Decisions
//! - Internal error details are logged, never sent to the client
//! - `path` comes from the request context in scope
//! - Panic responses carry an empty `path`: the catch-panic layer runs
//!   outside any request context and the payload is resumed untouched

use std::any::Any;
use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::http::request::RequestContext;
use crate::observability::Failure;

/// Message sent to clients in place of internal error details.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Response extension marking a response produced by a failed handler.
#[derive(Debug, Clone)]
pub struct HandlerFailure(pub Failure);

/// Attach a [`HandlerFailure`] marker to `response`.
pub fn attach_failure(mut response: Response, failure: Failure) -> Response {
    response.extensions_mut().insert(HandlerFailure(failure));
    response
}

/// Error body shared by every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    pub status_code: u16,
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
    pub path: String,
    pub message: Vec<String>,
    /// Reason phrase of the status code.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: Vec<String>, path: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: status.as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            path: path.into(),
            message,
            error: status.canonical_reason().unwrap_or("Error").to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Errors surfaced by handlers and middleware.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// Request body rejected by validation; one message per problem.
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl ApiError {
    /// Internal error wrapping `source`.
    pub fn internal(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        let source = source.into();
        ApiError::Internal {
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Messages exposed in the envelope.
    fn client_messages(&self) -> Vec<String> {
        match self {
            ApiError::Validation(messages) => messages.clone(),
            ApiError::Internal { .. } => vec![INTERNAL_ERROR_MESSAGE.to_string()],
            other => vec![other.to_string()],
        }
    }

    /// Build the response for a request at `path`.
    pub fn into_response_at(self, path: impl Into<String>) -> Response {
        let envelope = ErrorResponse::new(self.status(), self.client_messages(), path);
        attach_failure(envelope.into_response(), Failure::from_error(&self))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let path = RequestContext::current()
            .map(|context| context.path)
            .unwrap_or_default();
        self.into_response_at(path)
    }
}

/// Response for a panic caught at the outermost layer.
///
/// Only the payload reaches this point, so `path` is always empty; the
/// request path is in the error record logged before the unwind resumed.
pub fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response {
    ErrorResponse::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        vec![INTERNAL_ERROR_MESSAGE.to_string()],
        String::new(),
    )
    .into_response()
}
