//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer stack)
//!     → middleware/ (CORS, origin guard, request logging)
//!     → handlers.rs (health, fallback)
//!     → response.rs (error envelope)
//!     → Send to client
//! ```

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use extract::ValidatedJson;
pub use request::{RequestContext, RequestId, X_REQUEST_ID};
pub use response::{attach_failure, ApiError, ErrorResponse, HandlerFailure};
pub use server::{api_routes, build_router, build_router_with, AppState, HttpServer, API_PREFIX};
