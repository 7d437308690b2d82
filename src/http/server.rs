//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers under `/api`
//! - Wire up middleware (panic containment, body limit, CORS, origin guard,
//!   request logging)
//! - Mount API documentation when enabled
//! - Serve on a listener until shutdown

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::get;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::Settings;
use crate::docs;
use crate::health::HealthCheckService;
use crate::http::handlers;
use crate::http::middleware::{cors_layer, http_logging, origin_guard, AllowedOrigins, BODY_LIMIT};
use crate::http::response::panic_response;
use crate::observability::AppLogger;

/// Prefix of every application route.
pub const API_PREFIX: &str = "/api";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub logger: AppLogger,
    pub health: HealthCheckService,
}

/// Routes served under [`API_PREFIX`].
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

/// Build the application router with the default routes.
pub fn build_router(settings: &Settings, state: AppState) -> Router {
    build_router_with(settings, state, api_routes())
}

/// Build the application router around `api`.
pub fn build_router_with(settings: &Settings, state: AppState, api: Router<AppState>) -> Router {
    let logger = state.logger.clone();
    let origins = AllowedOrigins::new(settings.app.allowed_origins.clone());

    let app = Router::new()
        .nest(API_PREFIX, api)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(logger.clone(), http_logging))
        .layer(middleware::from_fn_with_state(origins, origin_guard));

    docs::mount_docs(app, settings, &logger)
        .layer(cors_layer(&settings.app.allowed_origins))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(CatchPanicLayer::custom(panic_response))
}

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
    logger: AppLogger,
}

impl HttpServer {
    pub fn new(settings: &Settings, state: AppState) -> Self {
        let logger = state.logger.clone();
        Self {
            router: build_router(settings, state),
            logger,
        }
    }

    pub fn from_router(router: Router, logger: AppLogger) -> Self {
        Self { router, logger }
    }

    /// Run the server on `listener` until `shutdown` resolves, then drain
    /// in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        self.logger.log("HTTP server stopped", Some("HttpServer"));
        Ok(())
    }
}
