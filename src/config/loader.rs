//! Configuration loading from the environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::Settings;
use crate::config::validation::{validate_settings, ValidationError};

/// Env file read when no explicit path is given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("config validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Key/value snapshot the schema is validated against.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: HashMap<String, String>,
}

impl EnvSource {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Process environment layered over an env file.
    ///
    /// With `None`, `.env` in the working directory is read if it exists.
    /// An explicit path that cannot be read is an error. Variables already
    /// set in the process take precedence over the file.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match env_file {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_ENV_FILE), false),
        };

        let mut source = match Self::read_env_file(&path) {
            Ok(source) => source,
            Err(e) if !required && e.not_found() => Self::default(),
            Err(source) => return Err(ConfigError::EnvFile { path, source }),
        };

        source.vars.extend(std::env::vars());
        Ok(source)
    }

    fn read_env_file(path: &Path) -> Result<Self, dotenvy::Error> {
        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path)? {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        Ok(Self { vars })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// Validate an already collected source.
pub fn settings_from_source(source: &EnvSource) -> Result<Settings, ConfigError> {
    validate_settings(source).map_err(ConfigError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn env_file_values_are_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "APP_SERVER_LOADER_TEST_A=from-file").unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "APP_SERVER_LOADER_TEST_B=\"quoted value\"").unwrap();

        let source = EnvSource::load(Some(file.path())).unwrap();

        assert_eq!(source.get("APP_SERVER_LOADER_TEST_A"), Some("from-file"));
        assert_eq!(source.get("APP_SERVER_LOADER_TEST_B"), Some("quoted value"));
    }

    #[test]
    fn process_environment_overrides_env_file() {
        // PATH is always present in the test process.
        let path = std::env::var("PATH").unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "PATH=/from/file").unwrap();

        let source = EnvSource::load(Some(file.path())).unwrap();

        assert_eq!(source.get("PATH"), Some(path.as_str()));
    }

    #[test]
    fn missing_explicit_env_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.env");

        let err = EnvSource::load(Some(&missing)).unwrap_err();

        assert!(matches!(err, ConfigError::EnvFile { .. }));
        assert!(err.to_string().contains("absent.env"));
    }

    #[test]
    fn validation_errors_are_aggregated_in_display() {
        let err = settings_from_source(&EnvSource::default()).unwrap_err();
        let message = err.to_string();

        assert!(message.starts_with("config validation failed"));
        assert!(message.contains("\"PORT\" is required"));
        assert!(message.contains("\"SWAGGER_PATH\" is required"));
    }
}
