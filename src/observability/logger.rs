//! Application logger service.
//!
//! # Responsibilities
//! - Leveled text logs with an optional context label
//! - Structured HTTP lifecycle records ([`HttpLog`])
//! - Single instance for the process, cloned into every consumer
//!
//! # Design Decisions
//! - Output goes through the [`LogSink`] seam; [`TracingSink`] is the
//!   production sink and forwards to `tracing` with structured fields
//! - Request/response records are logged at info, error records at error

use std::fmt;
use std::sync::Arc;

use crate::observability::records::HttpLog;

/// Target used for HTTP lifecycle events.
pub const HTTP_TARGET: &str = "app_server::http";

/// Severity of a text log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Verbose,
}

/// Destination for log output.
pub trait LogSink: Send + Sync {
    /// Write a text message.
    fn text(&self, level: Level, message: &str, context: Option<&str>, trace: Option<&str>);

    /// Write a structured HTTP record.
    fn http(&self, record: &HttpLog);
}

/// Sink forwarding to the global `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn text(&self, level: Level, message: &str, context: Option<&str>, trace: Option<&str>) {
        match level {
            Level::Error => tracing::error!(context, trace, "{}", message),
            Level::Warn => tracing::warn!(context, "{}", message),
            Level::Info => tracing::info!(context, "{}", message),
            Level::Debug => tracing::debug!(context, "{}", message),
            Level::Verbose => tracing::trace!(context, "{}", message),
        }
    }

    fn http(&self, record: &HttpLog) {
        match record {
            HttpLog::Request(log) => tracing::info!(
                target: HTTP_TARGET,
                log_type = "HTTP_REQUEST",
                request_id = %log.request_id,
                method = %log.method,
                url = %log.url,
                ip = %log.ip,
                user_agent = %log.user_agent,
                body = %log.body,
                "HTTP request"
            ),
            HttpLog::Response(log) => tracing::info!(
                target: HTTP_TARGET,
                log_type = "HTTP_RESPONSE",
                request_id = %log.request_id,
                method = %log.method,
                url = %log.url,
                status_code = log.status_code,
                response_time = %format_args!("{}ms", log.elapsed_ms),
                "HTTP response"
            ),
            HttpLog::Error(log) => tracing::error!(
                target: HTTP_TARGET,
                log_type = "HTTP_ERROR",
                request_id = %log.request_id,
                method = %log.method,
                url = %log.url,
                error = %log.error,
                stack = ?log.stack,
                response_time = %format_args!("{}ms", log.elapsed_ms),
                "HTTP error"
            ),
        }
    }
}

/// Process-wide logger handed to every component that logs.
#[derive(Clone)]
pub struct AppLogger {
    sink: Arc<dyn LogSink>,
}

impl AppLogger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Logger backed by [`TracingSink`].
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    pub fn log(&self, message: &str, context: Option<&str>) {
        self.sink.text(Level::Info, message, context, None);
    }

    pub fn error(&self, message: &str, trace: Option<&str>, context: Option<&str>) {
        self.sink.text(Level::Error, message, context, trace);
    }

    pub fn warn(&self, message: &str, context: Option<&str>) {
        self.sink.text(Level::Warn, message, context, None);
    }

    pub fn debug(&self, message: &str, context: Option<&str>) {
        self.sink.text(Level::Debug, message, context, None);
    }

    pub fn verbose(&self, message: &str, context: Option<&str>) {
        self.sink.text(Level::Verbose, message, context, None);
    }

    pub fn log_http(&self, record: &HttpLog) {
        self.sink.http(record);
    }
}

impl Default for AppLogger {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for AppLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppLogger").finish_non_exhaustive()
    }
}
