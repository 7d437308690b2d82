//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file + process environment
//!     → loader.rs (collect into EnvSource, process wins)
//!     → validation.rs (schema checks, every violation collected)
//!     → Settings (validated, immutable)
//!     → shared by reference / clone with all subsystems
//! ```
//!
//! # Design Decisions
//! - Every key is mandatory; startup aborts with the full list of violations
//! - Unknown keys are tolerated
//! - Settings are read once at startup, never reloaded

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{settings_from_source, ConfigError, EnvSource};
pub use schema::{AppConfig, AuthConfig, DatabaseConfig, Environment, Settings, SwaggerConfig};
pub use validation::ValidationError;
