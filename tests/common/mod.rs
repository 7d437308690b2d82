//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use app_server::config::{settings_from_source, EnvSource, Settings};
use app_server::health::{DatabaseHealthIndicator, HealthCheckService};
use app_server::http::{api_routes, build_router_with, AppState, HttpServer};
use app_server::test_support::{full_env, RecordingSink, StubDatabase};
use app_server::{AppLogger, Shutdown};

/// Settings from the full fixture with `overrides` applied.
pub fn settings(overrides: &[(&'static str, &str)]) -> Settings {
    let mut pairs = full_env();
    for (key, value) in overrides {
        pairs.retain(|(k, _)| k != key);
        pairs.push((*key, value.to_string()));
    }
    settings_from_source(&EnvSource::from_pairs(pairs)).unwrap()
}

/// Application under test plus the sink it logs into.
pub struct TestApp {
    pub router: Router,
    pub sink: Arc<RecordingSink>,
    pub logger: AppLogger,
}

/// Build the full router with `extra` routes merged under `/api`.
pub fn app_with(settings: &Settings, database: StubDatabase, extra: Router<AppState>) -> TestApp {
    let sink = Arc::new(RecordingSink::default());
    let logger = AppLogger::new(sink.clone());
    let health = HealthCheckService::new().with_indicator(
        "database",
        Arc::new(DatabaseHealthIndicator::new(database.shared())),
    );
    let state = AppState {
        logger: logger.clone(),
        health,
    };

    TestApp {
        router: build_router_with(settings, state, api_routes().merge(extra)),
        sink,
        logger,
    }
}

pub fn app(settings: &Settings) -> TestApp {
    app_with(settings, StubDatabase::up(), Router::new())
}

/// HTTP client that ignores proxy settings from the environment.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// A server running on an ephemeral port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        client().get(self.url(path)).send().await.unwrap()
    }
}

/// Serve `app` on `127.0.0.1:0`.
pub async fn spawn_server(app: &TestApp) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server = HttpServer::from_router(app.router.clone(), app.logger.clone());
    let handle = tokio::spawn(server.run(listener, shutdown.signalled()));

    RunningServer {
        addr,
        shutdown,
        handle,
    }
}
