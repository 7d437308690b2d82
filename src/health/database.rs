//! Database access used by the health probe.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Upper bound on waiting for a pooled connection during a probe.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Error type for database round-trips.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("{0}")]
    Query(#[from] sqlx::Error),

    #[error("database unavailable: {0}")]
    Unavailable(String),
}

/// Minimal database surface needed by health checks.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a trivial round-trip query.
    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[async_trait]
impl Database for PgPool {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(self).await?;
        Ok(())
    }
}

/// Build a pool that connects on first use.
///
/// Startup does not wait for the database; an unreachable server shows up
/// as a `down` indicator instead of a boot failure.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(&config.url)?;
    Ok(pool)
}
