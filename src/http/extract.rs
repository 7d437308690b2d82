//! Request body extraction with validation.
//!
//! [`ValidatedJson`] rejects malformed JSON and bodies that do not match
//! the target type. Request DTOs declare `#[serde(deny_unknown_fields)]` so
//! undeclared fields are rejected too.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::response::ApiError;

/// JSON body deserialized into `T`, or a 400 with the standard envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(reject)?;

        serde_json::from_value(value)
            .map(ValidatedJson)
            .map_err(|e| ApiError::Validation(vec![e.to_string()]))
    }
}

fn reject(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(rejection.body_text())
    } else {
        ApiError::BadRequest(rejection.body_text())
    }
}
