//! Aggregated health report.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use utoipa::ToSchema;

use crate::health::indicator::{HealthIndicator, HealthStatus, IndicatorDetail};

/// Overall status of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Ok,
    Error,
}

/// Report served by the health endpoint.
///
/// `info` holds the indicators that are up, `error` those that are down,
/// `details` all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: ReportStatus,
    pub info: BTreeMap<String, IndicatorDetail>,
    pub error: BTreeMap<String, IndicatorDetail>,
    pub details: BTreeMap<String, IndicatorDetail>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status == ReportStatus::Ok
    }
}

/// Runs every registered indicator and folds the results.
#[derive(Clone, Default)]
pub struct HealthCheckService {
    indicators: Vec<(String, Arc<dyn HealthIndicator>)>,
}

impl HealthCheckService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an indicator under `key`.
    pub fn with_indicator(mut self, key: impl Into<String>, indicator: Arc<dyn HealthIndicator>) -> Self {
        self.indicators.push((key.into(), indicator));
        self
    }

    pub async fn check(&self) -> HealthReport {
        let results = join_all(
            self.indicators
                .iter()
                .map(|(key, indicator)| indicator.check(key)),
        )
        .await;

        let mut info = BTreeMap::new();
        let mut error = BTreeMap::new();
        let mut details = BTreeMap::new();
        for result in results {
            for (key, detail) in result.0 {
                if detail.status == HealthStatus::Up {
                    info.insert(key.clone(), detail.clone());
                } else {
                    error.insert(key.clone(), detail.clone());
                }
                details.insert(key, detail);
            }
        }

        let status = if error.is_empty() {
            ReportStatus::Ok
        } else {
            ReportStatus::Error
        };

        HealthReport {
            status,
            info,
            error,
            details,
        }
    }
}
