//! Request interceptors.
//!
//! # Order (outermost first)
//! ```text
//! catch-panic → body limit → cors → origin_guard → http_logging → handler
//! ```

pub mod cors;
pub mod http_logging;
pub mod origin_guard;

pub use cors::cors_layer;
pub use http_logging::{http_logging, BODY_LIMIT};
pub use origin_guard::{is_origin_allowed, origin_guard, AllowedOrigins, ORIGIN_NOT_ALLOWED};
