//! Health indicators.
//!
//! # Responsibilities
//! - Probe a single dependency under a caller-chosen key
//! - Report `{ key: { status: "up" } }` or `{ key: { status: "down", message } }`
//!
//! # Design Decisions
//! - Indicators never return errors; failures become `down` results

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::health::database::Database;

/// Status of one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Outcome of one indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IndicatorDetail {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Indicator results keyed by indicator name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HealthIndicatorResult(pub BTreeMap<String, IndicatorDetail>);

impl HealthIndicatorResult {
    pub fn up(key: &str) -> Self {
        Self::single(
            key,
            IndicatorDetail {
                status: HealthStatus::Up,
                message: None,
            },
        )
    }

    pub fn down(key: &str, message: impl Into<String>) -> Self {
        Self::single(
            key,
            IndicatorDetail {
                status: HealthStatus::Down,
                message: Some(message.into()),
            },
        )
    }

    fn single(key: &str, detail: IndicatorDetail) -> Self {
        Self(BTreeMap::from([(key.to_string(), detail)]))
    }

    /// True when every entry is up.
    pub fn is_up(&self) -> bool {
        self.0.values().all(|d| d.status == HealthStatus::Up)
    }
}

/// A dependency probe.
#[async_trait]
pub trait HealthIndicator: Send + Sync {
    async fn check(&self, key: &str) -> HealthIndicatorResult;
}

/// Probes the database with a `SELECT 1` round-trip.
#[derive(Clone)]
pub struct DatabaseHealthIndicator {
    database: Arc<dyn Database>,
}

impl DatabaseHealthIndicator {
    pub fn new(database: Arc<dyn Database>) -> Self {
        Self { database }
    }

    pub async fn is_healthy(&self, key: &str) -> HealthIndicatorResult {
        match self.database.ping().await {
            Ok(()) => HealthIndicatorResult::up(key),
            Err(e) => {
                tracing::warn!(indicator = key, error = %e, "Health probe failed");
                HealthIndicatorResult::down(key, e.to_string())
            }
        }
    }
}

#[async_trait]
impl HealthIndicator for DatabaseHealthIndicator {
    async fn check(&self, key: &str) -> HealthIndicatorResult {
        self.is_healthy(key).await
    }
}
