//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Console output plus daily-rotated files, one per level
//! - Configure log level at runtime
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Log level follows the environment, `RUST_LOG` overrides it
//! - Each level file holds its level and everything more severe
//! - Rotated files are kept for [`MAX_LOG_FILES`] days

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_appender::rolling::InitError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{EnvSource, Environment};

/// Timestamp layout for human-readable output.
const TIME_FORMAT: &str = "%m/%d/%Y, %I:%M:%S %p";

/// Default directory for rotated log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Optional key selecting the log directory.
pub const LOG_DIR_KEY: &str = "LOG_DIR";

/// Rotated files kept per level.
pub const MAX_LOG_FILES: usize = 14;

/// File prefix and most verbose level written to it.
pub const LEVEL_FILES: [(&str, LevelFilter); 3] = [
    ("error", LevelFilter::ERROR),
    ("info", LevelFilter::INFO),
    ("debug", LevelFilter::DEBUG),
];

/// Error type for logging initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {}: {source}", path.display())]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open {prefix} log file: {source}")]
    Appender {
        prefix: &'static str,
        #[source]
        source: InitError,
    },

    #[error("failed to install global subscriber: {0}")]
    Install(String),
}

/// Configuration for the logging subsystem.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub environment: Environment,
    /// Directory for rotated files; `None` disables file output.
    pub log_dir: Option<PathBuf>,
}

impl LoggingConfig {
    /// Derive logging settings from the raw source.
    ///
    /// Runs before schema validation so that validation failures can be
    /// logged; an unknown `NODE_ENV` falls back to development.
    pub fn from_source(source: &EnvSource) -> Self {
        let environment = source
            .get("NODE_ENV")
            .and_then(|value| value.parse().ok())
            .unwrap_or(Environment::Development);
        let log_dir = source
            .get(LOG_DIR_KEY)
            .filter(|dir| !dir.is_empty())
            .unwrap_or(DEFAULT_LOG_DIR);

        Self {
            environment,
            log_dir: Some(PathBuf::from(log_dir)),
        }
    }

    /// Default filter directive when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> &'static str {
        match self.environment {
            Environment::Production => "info",
            Environment::Development | Environment::Test => "debug",
        }
    }

    fn json(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Keeps the file writer thread alive; hold for the process lifetime.
pub struct LogGuard {
    _file_guards: Vec<WorkerGuard>,
}

/// Install the global subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<LogGuard, LoggingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let console = tracing_subscriber::fmt::layer()
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_target(true);
    let console = if config.json() {
        console.json().flatten_event(true).boxed()
    } else {
        console.boxed()
    };

    let mut layers = vec![console];
    let mut file_guards = Vec::new();

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::LogDir {
            path: log_dir.clone(),
            source,
        })?;

        for (prefix, level) in LEVEL_FILES {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(log_dir, prefix)?);
            file_guards.push(guard);

            // JSON so the files stay machine-parseable.
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer)
                    .json()
                    .flatten_event(true)
                    .with_filter(level)
                    .boxed(),
            );
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(LogGuard {
        _file_guards: file_guards,
    })
}

/// Daily appender writing `<prefix>.<date>.log` under `dir`.
fn file_appender(dir: &Path, prefix: &'static str) -> Result<RollingFileAppender, LoggingError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .map_err(|source| LoggingError::Appender { prefix, source })
}
