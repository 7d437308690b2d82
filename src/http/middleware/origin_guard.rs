//! Origin allowlist guard.
//!
//! Requests carrying an `Origin` (or, failing that, a `Referer`) header must
//! start with one of the configured prefixes. Requests with neither header
//! are let through; same-origin and non-browser clients do not send them.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{ORIGIN, REFERER};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::http::response::ApiError;

/// Message of the 403 returned for rejected origins.
pub const ORIGIN_NOT_ALLOWED: &str = "Origin not allowed";

/// Allowed origin prefixes, shared by every request.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigins(Arc<[String]>);

impl AllowedOrigins {
    pub fn new(origins: impl Into<Arc<[String]>>) -> Self {
        Self(origins.into())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Whether the request's origin passes the allowlist.
///
/// Literal prefix match against the header value; no URL parsing. Values
/// that are not visible ASCII never match.
pub fn is_origin_allowed(headers: &HeaderMap, allowed: &[String]) -> bool {
    let value = headers
        .get(ORIGIN)
        .filter(|v| !v.is_empty())
        .or_else(|| headers.get(REFERER).filter(|v| !v.is_empty()));

    let Some(value) = value else {
        return true;
    };
    let Ok(origin) = value.to_str() else {
        return false;
    };

    allowed.iter().any(|prefix| origin.starts_with(prefix.as_str()))
}

pub async fn origin_guard(
    State(origins): State<AllowedOrigins>,
    request: Request,
    next: Next,
) -> Response {
    if is_origin_allowed(request.headers(), origins.as_slice()) {
        return next.run(request).await;
    }

    tracing::debug!(
        origin = ?request.headers().get(ORIGIN),
        referer = ?request.headers().get(REFERER),
        path = %request.uri().path(),
        "Origin rejected"
    );
    ApiError::Forbidden(ORIGIN_NOT_ALLOWED.to_string()).into_response_at(request.uri().path())
}
