//! Startup orchestration.
//!
//! # Responsibilities
//! - Report configuration failures one line per problem
//! - Install logging before anything else can log
//! - Initialize subsystems in dependency order
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, EnvSource, Settings};
use crate::health::{connect_lazy, DatabaseError, DatabaseHealthIndicator, HealthCheckService};
use crate::http::{AppState, HttpServer};
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::logging::LoggingError;
use crate::observability::{init_logging, AppLogger, LogGuard, LoggingConfig};

/// Log context for startup messages.
const CONTEXT: &str = "Bootstrap";

/// Key of the database entry in health reports.
pub const DATABASE_INDICATOR: &str = "database";

/// Error type for startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl StartupError {
    /// Log the error through `logger`; configuration errors get one line
    /// per violation.
    pub fn report(&self, logger: &AppLogger) {
        match self {
            StartupError::Config(ConfigError::Validation(errors)) => {
                for error in errors {
                    logger.error(&error.to_string(), None, Some("Config"));
                }
                logger.error("Invalid configuration", None, Some(CONTEXT));
            }
            other => logger.error(&other.to_string(), None, Some(CONTEXT)),
        }
    }
}

/// Install logging as configured by the raw `source`.
///
/// Nothing is logged yet when this fails, so callers print the error
/// themselves.
pub fn start_logging(source: &EnvSource) -> Result<LogGuard, StartupError> {
    Ok(init_logging(&LoggingConfig::from_source(source))?)
}

/// Bind the listener on every interface at `port`.
pub async fn bind(port: u16) -> Result<TcpListener, StartupError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}

/// Build every subsystem and serve until `shutdown` is triggered.
pub async fn bootstrap(
    settings: Settings,
    logger: AppLogger,
    shutdown: Shutdown,
) -> Result<(), StartupError> {
    tracing::debug!(
        env = %settings.app.env,
        version = %settings.app.version,
        database = ?settings.database,
        "Configuration loaded"
    );

    let pool = connect_lazy(&settings.database)?;
    let health = HealthCheckService::new().with_indicator(
        DATABASE_INDICATOR,
        Arc::new(DatabaseHealthIndicator::new(Arc::new(pool))),
    );

    let state = AppState {
        logger: logger.clone(),
        health,
    };
    let server = HttpServer::new(&settings, state);

    let listener = bind(settings.app.port).await?;
    logger.log(
        &format!(
            "Application is running on: http://localhost:{}/api",
            settings.app.port
        ),
        Some(CONTEXT),
    );

    server
        .run(listener, shutdown.signalled())
        .await
        .map_err(StartupError::Serve)
}
