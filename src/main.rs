//! Application server.
//!
//! ```text
//!   .env + process environment
//!        │
//!        ▼
//!   ┌─────────┐   ┌───────────────┐   ┌──────────────────────────────────┐
//!   │ config  │──▶│ observability │──▶│ lifecycle::bootstrap             │
//!   │ (typed) │   │ (tracing)     │   │  health ─▶ http server ─▶ /api/* │
//!   └─────────┘   └───────────────┘   └──────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use app_server::config::{settings_from_source, EnvSource};
use app_server::lifecycle::{bootstrap, spawn_signal_listener, start_logging, StartupError};
use app_server::observability::AppLogger;
use app_server::Shutdown;

#[derive(Parser)]
#[command(name = "app-server")]
#[command(about = "Application server with correlated request logging", long_about = None)]
struct Cli {
    /// Dotenv file to load; defaults to `.env` when present.
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match EnvSource::load(cli.env_file.as_deref()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match start_logging(&source) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let logger = AppLogger::tracing();

    match run(&source, logger.clone()).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            e.report(&logger);
            ExitCode::FAILURE
        }
    }
}

async fn run(source: &EnvSource, logger: AppLogger) -> Result<(), StartupError> {
    let settings = settings_from_source(source)?;

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone(), logger.clone());

    bootstrap(settings, logger, shutdown).await
}
