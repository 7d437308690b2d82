//! Route handlers.

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::health::HealthReport;
use crate::http::response::{attach_failure, ApiError, ErrorResponse};
use crate::http::server::AppState;
use crate::observability::Failure;

/// Failure message of an unhealthy report.
pub const SERVICE_UNAVAILABLE: &str = "Service Unavailable";

/// Aggregated dependency health.
///
/// A report with any indicator down is returned with 503 and counts as a
/// failed request.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Every dependency is up", body = HealthReport),
        (status = 503, description = "At least one dependency is down", body = HealthReport),
        (status = 403, description = "Origin not allowed", body = ErrorResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Response {
    let report = state.health.check().await;
    if report.is_ok() {
        return Json(report).into_response();
    }

    let failure = Failure::from_error(&ApiError::ServiceUnavailable(SERVICE_UNAVAILABLE.to_string()));
    attach_failure((StatusCode::SERVICE_UNAVAILABLE, Json(report)).into_response(), failure)
}

/// Fallback for unmatched routes.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Cannot {} {}", method, uri.path()))
}
