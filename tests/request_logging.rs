//! Request lifecycle logging through the full router.

mod common;

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceExt;

use app_server::http::{ApiError, AppState, ValidatedJson, X_REQUEST_ID};
use app_server::observability::{HttpLog, UNKNOWN_ERROR_MESSAGE};
use app_server::test_support::StubDatabase;

use common::{app_with, settings, TestApp};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateItem {
    name: String,
}

async fn create_item(ValidatedJson(item): ValidatedJson<CreateItem>) -> Json<Value> {
    Json(json!({ "name": item.name }))
}

async fn failing() -> Result<&'static str, ApiError> {
    Err(ApiError::internal(std::io::Error::other("disk on fire")))
}

async fn panicking() -> &'static str {
    panic!("handler exploded")
}

async fn panicking_with_error() -> &'static str {
    let error: Box<dyn StdError + Send + Sync> = Box::new(std::io::Error::other("pool closed"));
    std::panic::panic_any(error)
}

const DELAY: Duration = Duration::from_millis(50);

async fn slow() -> &'static str {
    tokio::time::sleep(DELAY).await;
    "ok"
}

async fn slow_failing() -> Result<&'static str, ApiError> {
    tokio::time::sleep(DELAY).await;
    Err(ApiError::ServiceUnavailable("upstream timed out".into()))
}

fn test_routes() -> Router<AppState> {
    Router::new()
        .route("/ok", get(|| async { "ok" }))
        .route("/items", post(create_item))
        .route("/fail", get(failing))
        .route("/panic", get(panicking))
        .route("/panic-error", get(panicking_with_error))
        .route("/slow", get(slow))
        .route("/slow-fail", get(slow_failing))
}

fn test_app() -> TestApp {
    app_with(&settings(&[]), StubDatabase::up(), test_routes())
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn successful_request_logs_request_then_response() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/ok?page=2")
                .header("user-agent", "integration-test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let records = app.sink.records();
    assert_eq!(records.len(), 2);

    let HttpLog::Request(request) = &records[0] else {
        panic!("expected request record, got {:?}", records[0]);
    };
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "/api/ok?page=2");
    assert_eq!(request.user_agent, "integration-test");
    assert_eq!(request.ip, "unknown");
    assert_eq!(request.body, Value::Null);

    let HttpLog::Response(done) = &records[1] else {
        panic!("expected response record, got {:?}", records[1]);
    };
    assert_eq!(done.request_id, request.request_id);
    assert_eq!(done.status_code, 200);
    assert_eq!(done.url, "/api/ok?page=2");
}

#[tokio::test]
async fn request_id_is_echoed_in_header() {
    let app = test_app();

    let response = app.router.clone().oneshot(get_request("/api/ok")).await.unwrap();

    let header = response.headers().get(X_REQUEST_ID).unwrap().to_str().unwrap().to_string();
    assert_eq!(header, app.sink.records()[0].request_id().to_string());
}

#[tokio::test]
async fn every_request_gets_a_distinct_id() {
    let app = test_app();

    for _ in 0..3 {
        app.router.clone().oneshot(get_request("/api/ok")).await.unwrap();
    }

    let mut ids: Vec<String> = app
        .sink
        .records()
        .iter()
        .filter(|r| matches!(r, HttpLog::Request(_)))
        .map(|r| r.request_id().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn json_body_is_logged() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/items")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"widget"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "name": "widget" }));

    let HttpLog::Request(request) = &app.sink.records()[0] else {
        panic!("expected request record");
    };
    assert_eq!(request.body, json!({ "name": "widget" }));
}

#[tokio::test]
async fn handler_error_logs_error_instead_of_response() {
    let app = test_app();

    let response = app.router.clone().oneshot(get_request("/api/fail")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["message"][0], "Internal server error");
    assert_eq!(body["path"], "/api/fail");

    let records = app.sink.records();
    assert_eq!(records.len(), 2);
    let HttpLog::Error(error) = &records[1] else {
        panic!("expected error record, got {:?}", records[1]);
    };
    assert_eq!(error.request_id, records[0].request_id());
    assert_eq!(error.error, "disk on fire");
    assert!(error.stack.as_ref().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn undeclared_body_fields_are_rejected_and_logged_as_error() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/items")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"widget","admin":true}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let records = app.sink.records();
    assert!(matches!(records[1], HttpLog::Error(_)));
}

#[tokio::test]
async fn panic_with_string_payload_logs_unknown_error() {
    let app = test_app();

    let response = app.router.clone().oneshot(get_request("/api/panic")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let records = app.sink.records();
    assert_eq!(records.len(), 2);
    let HttpLog::Error(error) = &records[1] else {
        panic!("expected error record, got {:?}", records[1]);
    };
    assert_eq!(error.error, UNKNOWN_ERROR_MESSAGE);
    assert_eq!(error.stack, None);

    // The outermost layer only sees the payload.
    let body = body_json(response).await;
    assert_eq!(body["statusCode"], 500);
    assert_eq!(body["path"], "");
}

#[tokio::test]
async fn panic_with_error_payload_logs_its_message() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/panic-error"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let HttpLog::Error(error) = &app.sink.records()[1] else {
        panic!("expected error record");
    };
    assert_eq!(error.error, "pool closed");
}

#[tokio::test]
async fn unknown_route_is_a_logged_404() {
    let app = test_app();

    let response = app.router.clone().oneshot(get_request("/api/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"][0], "Cannot GET /api/nope");

    let records = app.sink.records();
    assert_eq!(records.len(), 2);
    assert!(matches!(records[1], HttpLog::Error(_)));
}

#[tokio::test]
async fn rejected_origin_is_forbidden_and_not_logged() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/ok")
                .header("origin", "https://evil.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(X_REQUEST_ID).is_none());

    let body = body_json(response).await;
    assert_eq!(body["message"], json!(["Origin not allowed"]));
    assert_eq!(body["path"], "/api/ok");
    assert!(app.sink.records().is_empty());
}

#[tokio::test]
async fn allowed_origin_passes_and_gets_cors_headers() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/ok")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        response.headers().get("access-control-allow-credentials").unwrap(),
        "true"
    );
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = test_app();
    let body = vec![b'a'; app_server::http::middleware::BODY_LIMIT + 1];

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/items")
                .header("content-type", "application/json")
                .header("content-length", body.len())
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.sink.records().is_empty());
}

#[tokio::test]
async fn response_time_covers_handler_duration() {
    let app = test_app();

    let response = app.router.clone().oneshot(get_request("/api/slow")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let HttpLog::Response(log) = &app.sink.records()[1] else {
        panic!("expected response record");
    };
    assert!(log.elapsed_ms >= 50, "elapsed {}ms", log.elapsed_ms);
}

#[tokio::test]
async fn error_time_covers_handler_duration() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/slow-fail"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let HttpLog::Error(log) = &app.sink.records()[1] else {
        panic!("expected error record");
    };
    assert_eq!(log.error, "upstream timed out");
    assert!(log.elapsed_ms >= 50, "elapsed {}ms", log.elapsed_ms);
}

#[tokio::test]
async fn oversized_chunked_body_is_rejected() {
    let app = test_app();
    let chunk = Bytes::from(vec![b'a'; 1024 * 1024]);
    let chunks: Vec<Result<Bytes, std::io::Error>> = (0..3).map(|_| Ok(chunk.clone())).collect();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/items")
                .header("content-type", "application/json")
                .body(Body::from_stream(futures_util::stream::iter(chunks)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.sink.records().is_empty());
}

#[tokio::test]
async fn broken_body_stream_is_a_bad_request() {
    let app = test_app();
    let chunks = vec![
        Ok(Bytes::from_static(br#"{"name":"#)),
        Err(std::io::Error::other("connection reset")),
    ];

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/items")
                .header("content-type", "application/json")
                .body(Body::from_stream(futures_util::stream::iter(chunks)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["path"], "/api/items");
    assert_eq!(body["message"][0], "Invalid request body");
    assert!(app.sink.records().is_empty());
}
