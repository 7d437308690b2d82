//! Request identity and metadata.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Scope the active request's context to the handler's task
//! - Extract client IP, user agent and URL for logging
//!
//! # Design Decisions
//! - The ID lives in request extensions and a task-local, nowhere else
//! - Missing client metadata is reported as `"unknown"`

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{header, Request};
use serde::{Serialize, Serializer};
use tokio::task_local;
use uuid::Uuid;

/// Header echoing the request ID on responses.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Placeholder for absent client metadata.
pub const UNKNOWN: &str = "unknown";

task_local! {
    static REQUEST_CONTEXT: RequestContext;
}

/// Correlation identifier joining a request's log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Serialize for RequestId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Context of the request currently being handled on this task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub path: String,
}

impl RequestContext {
    /// Context in scope, if any.
    pub fn current() -> Option<Self> {
        REQUEST_CONTEXT.try_with(Clone::clone).ok()
    }

    /// Run `fut` with `self` in scope.
    ///
    /// Tokio task-locals are not inherited by spawned tasks; re-scope
    /// explicitly when moving work elsewhere.
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        REQUEST_CONTEXT.scope(self, fut).await
    }
}

/// Path and query of the request, as sent.
pub fn original_url<B>(request: &Request<B>) -> String {
    request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Peer address recorded by the server, or `"unknown"`.
pub fn client_ip<B>(request: &Request<B>) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// `User-Agent` header, or `"unknown"` when absent or not valid text.
pub fn user_agent<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}
