//! Web-service application skeleton.
//!
//! Configuration loading, correlated request/response logging, origin
//! guarding, OpenAPI documentation and a database health check.

// Core subsystems
pub mod config;
pub mod http;

// Dependencies and documentation
pub mod docs;
pub mod health;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::Settings;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::AppLogger;
