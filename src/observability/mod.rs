//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request pipeline / startup code:
//!     → logger.rs (AppLogger: text logs + HttpLog records)
//!     → LogSink (TracingSink in production)
//!     → logging.rs (tracing subscriber: console + rotated files)
//!
//! Handler failures:
//!     → failure.rs (message + stack extraction)
//!     → records.rs (HttpErrorLog)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID joins every record of one request
//! - One logger instance per process, injected where needed

pub mod failure;
pub mod logger;
pub mod logging;
pub mod records;

pub use failure::{Failure, UNKNOWN_ERROR_MESSAGE};
pub use logger::{AppLogger, Level, LogSink, TracingSink};
pub use logging::{init_logging, LogGuard, LoggingConfig};
pub use records::{HttpErrorLog, HttpLog, HttpRequestLog, HttpResponseLog};
