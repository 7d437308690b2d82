//! Structured HTTP log records.
//!
//! One [`HttpLog`] per lifecycle event of a request, joined by the request's
//! [`RequestId`]. Records serialize to flat JSON objects tagged by `type`.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::http::request::RequestId;

/// Tagged union of the three HTTP lifecycle records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum HttpLog {
    #[serde(rename = "HTTP_REQUEST")]
    Request(HttpRequestLog),
    #[serde(rename = "HTTP_RESPONSE")]
    Response(HttpResponseLog),
    #[serde(rename = "HTTP_ERROR")]
    Error(HttpErrorLog),
}

impl HttpLog {
    pub fn request_id(&self) -> RequestId {
        match self {
            HttpLog::Request(log) => log.request_id,
            HttpLog::Response(log) => log.request_id,
            HttpLog::Error(log) => log.request_id,
        }
    }

    /// Wire tag of the record.
    pub fn kind(&self) -> &'static str {
        match self {
            HttpLog::Request(_) => "HTTP_REQUEST",
            HttpLog::Response(_) => "HTTP_RESPONSE",
            HttpLog::Error(_) => "HTTP_ERROR",
        }
    }

    /// Elapsed time for terminal records.
    pub fn elapsed_ms(&self) -> Option<u64> {
        match self {
            HttpLog::Request(_) => None,
            HttpLog::Response(log) => Some(log.elapsed_ms),
            HttpLog::Error(log) => Some(log.elapsed_ms),
        }
    }

    /// Render as a single-line JSON object.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"type\":\"{}\"}}", self.kind()))
    }
}

/// Emitted when a request enters the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequestLog {
    pub request_id: RequestId,
    pub method: String,
    pub url: String,
    pub ip: String,
    pub user_agent: String,
    pub body: Value,
}

/// Emitted when the handler completed normally.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponseLog {
    pub request_id: RequestId,
    pub method: String,
    pub url: String,
    pub status_code: u16,
    #[serde(rename = "responseTime", serialize_with = "as_millis")]
    pub elapsed_ms: u64,
}

/// Emitted when the handler failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpErrorLog {
    pub request_id: RequestId,
    pub method: String,
    pub url: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
    #[serde(rename = "responseTime", serialize_with = "as_millis")]
    pub elapsed_ms: u64,
}

fn as_millis<S: Serializer>(elapsed_ms: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{elapsed_ms}ms"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_record_serializes_with_type_tag() {
        let id = RequestId::generate();
        let log = HttpLog::Request(HttpRequestLog {
            request_id: id,
            method: "POST".into(),
            url: "/api/items?x=1".into(),
            ip: "127.0.0.1".into(),
            user_agent: "unknown".into(),
            body: json!({ "name": "a" }),
        });

        let value = serde_json::to_value(&log).unwrap();

        assert_eq!(value["type"], "HTTP_REQUEST");
        assert_eq!(value["requestId"], id.to_string());
        assert_eq!(value["userAgent"], "unknown");
        assert_eq!(value["body"]["name"], "a");
    }

    #[test]
    fn terminal_records_render_response_time_in_ms() {
        let log = HttpLog::Response(HttpResponseLog {
            request_id: RequestId::generate(),
            method: "GET".into(),
            url: "/api/health".into(),
            status_code: 200,
            elapsed_ms: 12,
        });

        let value = serde_json::to_value(&log).unwrap();

        assert_eq!(value["type"], "HTTP_RESPONSE");
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["responseTime"], "12ms");
        assert_eq!(log.elapsed_ms(), Some(12));
    }

    #[test]
    fn absent_stack_is_omitted() {
        let log = HttpLog::Error(HttpErrorLog {
            request_id: RequestId::generate(),
            method: "GET".into(),
            url: "/".into(),
            error: "Unknown error occurred".into(),
            stack: None,
            elapsed_ms: 0,
        });

        let value = serde_json::to_value(&log).unwrap();

        assert_eq!(value["type"], "HTTP_ERROR");
        assert!(value.get("stack").is_none());
        assert!(log.to_json().starts_with("{\"type\":\"HTTP_ERROR\""));
    }
}
