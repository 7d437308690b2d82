//! Request lifecycle logging.
//!
//! # Responsibilities
//! - Assign a correlation ID (UUID v4) to every request
//! - Log the request before the handler runs
//! - Log exactly one terminal record: response xor error
//! - Echo the ID in the `x-request-id` response header
//!
//! # Design Decisions
//! - Bodies are buffered up to [`BODY_LIMIT`] so they can be logged and then
//!   handed to the handler unchanged; only an exceeded limit is a 413, any
//!   other body failure is a 400
//! - Error responses are recognized by their [`HandlerFailure`] marker and
//!   passed through untouched
//! - Panics are logged and then resumed; the outer catch-panic layer owns
//!   the 500
//! - A request dropped mid-flight emits no terminal record

use std::error::Error as StdError;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use futures_util::FutureExt;
use http_body_util::LengthLimitError;
use serde_json::Value;

use crate::http::request::{client_ip, original_url, user_agent, RequestContext, RequestId, X_REQUEST_ID};
use crate::http::response::{ApiError, HandlerFailure};
use crate::observability::{
    AppLogger, Failure, HttpErrorLog, HttpLog, HttpRequestLog, HttpResponseLog,
};

/// Largest request body accepted (2 MiB).
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Fields shared by the records of one request.
struct Exchange {
    request_id: RequestId,
    method: String,
    url: String,
    start: Instant,
}

impl Exchange {
    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn response(&self, status_code: u16) -> HttpLog {
        HttpLog::Response(HttpResponseLog {
            request_id: self.request_id,
            method: self.method.clone(),
            url: self.url.clone(),
            status_code,
            elapsed_ms: self.elapsed_ms(),
        })
    }

    fn error(&self, failure: &Failure) -> HttpLog {
        HttpLog::Error(HttpErrorLog {
            request_id: self.request_id,
            method: self.method.clone(),
            url: self.url.clone(),
            error: failure.message(),
            stack: failure.stack(),
            elapsed_ms: self.elapsed_ms(),
        })
    }
}

pub async fn http_logging(
    State(logger): State<AppLogger>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let request_id = RequestId::generate();
    let path = request.uri().path().to_string();

    let exchange = Exchange {
        request_id,
        method: request.method().to_string(),
        url: original_url(&request),
        start,
    };
    let ip = client_ip(&request);
    let user_agent = user_agent(&request);

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(request_id = %request_id, error = %e, "Request body rejected");
            return body_error(&e).into_response_at(path);
        }
    };

    logger.log_http(&HttpLog::Request(HttpRequestLog {
        request_id,
        method: exchange.method.clone(),
        url: exchange.url.clone(),
        ip,
        user_agent,
        body: body_value(&bytes),
    }));

    let mut request = Request::from_parts(parts, Body::from(bytes));
    request.extensions_mut().insert(request_id);

    let context = RequestContext { request_id, path };
    let outcome = context
        .scope(AssertUnwindSafe(next.run(request)).catch_unwind())
        .await;

    match outcome {
        Ok(mut response) => {
            let record = match response.extensions().get::<HandlerFailure>() {
                Some(HandlerFailure(failure)) => exchange.error(failure),
                None => exchange.response(response.status().as_u16()),
            };
            logger.log_http(&record);

            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                response.headers_mut().insert(X_REQUEST_ID, value);
            }
            response
        }
        Err(payload) => {
            let failure = Failure::from_panic(&*payload);
            logger.log_http(&exchange.error(&failure));
            std::panic::resume_unwind(payload)
        }
    }
}

/// Client error for a body that could not be read.
fn body_error(error: &axum::Error) -> ApiError {
    if exceeds_limit(error) {
        ApiError::PayloadTooLarge("Request entity too large".to_string())
    } else {
        ApiError::BadRequest("Invalid request body".to_string())
    }
}

/// Whether a [`LengthLimitError`] appears anywhere in the source chain.
fn exceeds_limit(error: &axum::Error) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(error) = current {
        if error.is::<LengthLimitError>() {
            return true;
        }
        current = error.source();
    }
    false
}

/// Request body as logged: `null` when empty, parsed JSON when valid,
/// otherwise the raw text.
fn body_value(bytes: &Bytes) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
