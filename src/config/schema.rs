//! Configuration schema definitions.
//!
//! Typed settings produced by [`crate::config::validation`]. Every namespace
//! mirrors one group of environment keys; fields are public and read-only by
//! convention once startup has completed.

use std::fmt;
use std::str::FromStr;

/// Root settings for the application, grouped by namespace.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Process-level settings (environment, version, port, origins).
    pub app: AppConfig,

    /// Token settings (loaded and exposed, not enforced here).
    pub auth: AuthConfig,

    /// PostgreSQL connection settings.
    pub database: DatabaseConfig,

    /// API documentation settings.
    pub swagger: SwaggerConfig,
}

/// Deployment environment selected by `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    /// Accepted spellings, in declaration order.
    pub const ALLOWED: &'static [&'static str] = &["development", "production", "test"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Deployment environment.
    pub env: Environment,

    /// Version string published in the API documentation.
    pub version: String,

    /// TCP port the HTTP server binds to.
    pub port: u16,

    /// Origin prefixes accepted by the origin guard and CORS layer.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.env == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        self.env == Environment::Production
    }
}

/// Token settings.
#[derive(Clone)]
pub struct AuthConfig {
    /// Secret used to sign bearer tokens.
    pub jwt_secret: String,

    /// Token lifetime expression (e.g. `1d`).
    pub jwt_expires_in: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expires_in", &self.jwt_expires_in)
            .finish()
    }
}

/// PostgreSQL settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Name of the container running the database (local tooling).
    pub container_name: String,
    pub user: String,
    pub password: String,
    /// Database name.
    pub database: String,
    pub host: String,
    pub port: u16,
    /// Full connection URL used by the pool.
    pub url: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("container_name", &self.container_name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("url", &"<redacted>")
            .finish()
    }
}

/// API documentation settings.
#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    /// Mount the documentation UI at startup.
    pub enabled: bool,
    pub title: String,
    pub description: String,
    /// Mount path as configured (leading/trailing slashes optional).
    pub path: String,
}

impl SwaggerConfig {
    /// Mount path normalized to a single leading slash and no trailing slash.
    pub fn mount_path(&self) -> String {
        format!("/{}", self.path.trim_matches('/'))
    }

    /// Path serving the raw OpenAPI JSON document, next to the UI.
    pub fn document_path(&self) -> String {
        format!("{}-json", self.mount_path())
    }
}
