//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/health
//!     → service.rs (run every registered indicator)
//!     → indicator.rs (probe one dependency, report up/down)
//!     → database.rs (SELECT 1 round-trip)
//!     → HealthReport (ok when every indicator is up)
//! ```
//!
//! # Design Decisions
//! - Probes never fail: a broken dependency is reported as `down`
//! - Checks run on demand only, no background polling
//! - The database sits behind the [`Database`] trait so probes can be
//!   exercised without a live server

pub mod database;
pub mod indicator;
pub mod service;

pub use database::{connect_lazy, Database, DatabaseError};
pub use indicator::{
    DatabaseHealthIndicator, HealthIndicator, HealthIndicatorResult, HealthStatus, IndicatorDetail,
};
pub use service::{HealthCheckService, HealthReport, ReportStatus};
