//! Configuration validation.
//!
//! # Responsibilities
//! - Check that every required key is present and non-empty
//! - Parse numbers, ports, enums and boolean flags
//! - Assemble the typed [`Settings`]
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Unknown keys are ignored
//! - Validation is pure function: EnvSource → Result<Settings, Vec<ValidationError>>

use thiserror::Error;

use crate::config::loader::EnvSource;
use crate::config::schema::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, Settings, SwaggerConfig,
};

pub const NODE_ENV: &str = "NODE_ENV";
pub const VERSION: &str = "VERSION";
pub const PORT: &str = "PORT";
pub const ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";

pub const POSTGRES_CONTAINER_NAME: &str = "POSTGRES_CONTAINER_NAME";
pub const POSTGRES_USER: &str = "POSTGRES_USER";
pub const POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";
pub const POSTGRES_DB: &str = "POSTGRES_DB";
pub const POSTGRES_HOST: &str = "POSTGRES_HOST";
pub const POSTGRES_PORT: &str = "POSTGRES_PORT";
pub const POSTGRES_URL: &str = "POSTGRES_URL";

pub const JWT_SECRET: &str = "JWT_SECRET";
pub const JWT_EXPIRES_IN: &str = "JWT_EXPIRES_IN";

pub const SWAGGER_ENABLED: &str = "SWAGGER_ENABLED";
pub const SWAGGER_TITLE: &str = "SWAGGER_TITLE";
pub const SWAGGER_DESCRIPTION: &str = "SWAGGER_DESCRIPTION";
pub const SWAGGER_PATH: &str = "SWAGGER_PATH";

/// Every key the schema requires.
pub const REQUIRED_KEYS: &[&str] = &[
    NODE_ENV,
    VERSION,
    PORT,
    ALLOWED_ORIGINS,
    POSTGRES_CONTAINER_NAME,
    POSTGRES_USER,
    POSTGRES_PASSWORD,
    POSTGRES_DB,
    POSTGRES_HOST,
    POSTGRES_PORT,
    POSTGRES_URL,
    JWT_SECRET,
    JWT_EXPIRES_IN,
    SWAGGER_ENABLED,
    SWAGGER_TITLE,
    SWAGGER_DESCRIPTION,
    SWAGGER_PATH,
];

const FLAG_VALUES: &[&str] = &["true", "false"];

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("\"{key}\" is required")]
    Missing { key: &'static str },

    #[error("\"{key}\" is not allowed to be empty")]
    Empty { key: &'static str },

    #[error("\"{key}\" must be a number, got {value:?}")]
    NotANumber { key: &'static str, value: String },

    #[error("\"{key}\" must be a valid port, got {value:?}")]
    InvalidPort { key: &'static str, value: String },

    #[error("\"{key}\" must be one of [{}], got {value:?}", allowed.join(", "))]
    NotOneOf {
        key: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
}

impl ValidationError {
    /// Name of the offending key.
    pub fn key(&self) -> &'static str {
        match self {
            ValidationError::Missing { key }
            | ValidationError::Empty { key }
            | ValidationError::NotANumber { key, .. }
            | ValidationError::InvalidPort { key, .. }
            | ValidationError::NotOneOf { key, .. } => key,
        }
    }
}

/// Validate the source against the schema and build typed settings.
pub fn validate_settings(source: &EnvSource) -> Result<Settings, Vec<ValidationError>> {
    let mut fields = FieldReader::new(source);

    let app = read_app(&mut fields);
    let auth = read_auth(&mut fields);
    let database = read_database(&mut fields);
    let swagger = read_swagger(&mut fields);

    match (app, auth, database, swagger) {
        (Some(app), Some(auth), Some(database), Some(swagger)) if fields.errors.is_empty() => {
            Ok(Settings {
                app,
                auth,
                database,
                swagger,
            })
        }
        _ => Err(fields.errors),
    }
}

/// Split a comma-separated origin list, dropping blanks around entries.
pub fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

// Each reader touches every key of its namespace before combining, so a
// single pass records all violations.

fn read_app(fields: &mut FieldReader<'_>) -> Option<AppConfig> {
    let env = fields.choice::<Environment>(NODE_ENV, Environment::ALLOWED);
    let version = fields.string(VERSION);
    let port = fields.port(PORT);
    let origins = fields.string(ALLOWED_ORIGINS);

    Some(AppConfig {
        env: env?,
        version: version?,
        port: port?,
        allowed_origins: split_origins(&origins?),
    })
}

fn read_auth(fields: &mut FieldReader<'_>) -> Option<AuthConfig> {
    let jwt_secret = fields.string(JWT_SECRET);
    let jwt_expires_in = fields.string(JWT_EXPIRES_IN);

    Some(AuthConfig {
        jwt_secret: jwt_secret?,
        jwt_expires_in: jwt_expires_in?,
    })
}

fn read_database(fields: &mut FieldReader<'_>) -> Option<DatabaseConfig> {
    let container_name = fields.string(POSTGRES_CONTAINER_NAME);
    let user = fields.string(POSTGRES_USER);
    let password = fields.string(POSTGRES_PASSWORD);
    let database = fields.string(POSTGRES_DB);
    let host = fields.string(POSTGRES_HOST);
    let port = fields.port(POSTGRES_PORT);
    let url = fields.string(POSTGRES_URL);

    Some(DatabaseConfig {
        container_name: container_name?,
        user: user?,
        password: password?,
        database: database?,
        host: host?,
        port: port?,
        url: url?,
    })
}

fn read_swagger(fields: &mut FieldReader<'_>) -> Option<SwaggerConfig> {
    let enabled = fields.flag(SWAGGER_ENABLED);
    let title = fields.string(SWAGGER_TITLE);
    let description = fields.string(SWAGGER_DESCRIPTION);
    let path = fields.string(SWAGGER_PATH);

    Some(SwaggerConfig {
        enabled: enabled?,
        title: title?,
        description: description?,
        path: path?,
    })
}

/// Reads typed values out of the source, recording every failure.
struct FieldReader<'a> {
    source: &'a EnvSource,
    errors: Vec<ValidationError>,
}

impl<'a> FieldReader<'a> {
    fn new(source: &'a EnvSource) -> Self {
        Self {
            source,
            errors: Vec::new(),
        }
    }

    fn string(&mut self, key: &'static str) -> Option<String> {
        match self.source.get(key) {
            None => {
                self.errors.push(ValidationError::Missing { key });
                None
            }
            Some("") => {
                self.errors.push(ValidationError::Empty { key });
                None
            }
            Some(value) => Some(value.to_string()),
        }
    }

    fn port(&mut self, key: &'static str) -> Option<u16> {
        let raw = self.string(key)?;
        let trimmed = raw.trim();

        if let Ok(port) = trimmed.parse::<u16>() {
            return Some(port);
        }

        if trimmed.parse::<f64>().is_ok() {
            self.errors.push(ValidationError::InvalidPort { key, value: raw });
        } else {
            self.errors.push(ValidationError::NotANumber { key, value: raw });
        }
        None
    }

    fn choice<T: std::str::FromStr>(
        &mut self,
        key: &'static str,
        allowed: &'static [&'static str],
    ) -> Option<T> {
        let raw = self.string(key)?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors.push(ValidationError::NotOneOf {
                    key,
                    value: raw,
                    allowed,
                });
                None
            }
        }
    }

    fn flag(&mut self, key: &'static str) -> Option<bool> {
        let raw = self.string(key)?;
        match raw.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => {
                self.errors.push(ValidationError::NotOneOf {
                    key,
                    value: raw,
                    allowed: FLAG_VALUES,
                });
                None
            }
        }
    }
}
