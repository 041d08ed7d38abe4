//! `pension.toml` plus environment overrides.
//!
//! ```toml
//! [backend]
//! kind = "http"
//! base_url = "http://localhost:8000"
//! timeout_secs = 10
//! health_timeout_secs = 3
//!
//! [logging]
//! level = "info"
//! file = "pension.log"
//! ```
//!
//! Precedence, lowest first: built-in defaults, the file, the
//! `PENSION_API_*` environment variables, command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pension_core::BackendConfig;
use pension_core::backend::factory::{DEFAULT_BASE_URL, DEFAULT_HEALTH_TIMEOUT, DEFAULT_TIMEOUT};
use serde::Deserialize;
use thiserror::Error;

use crate::logging::DEFAULT_LEVEL;

pub const BASE_URL_ENV: &str = "PENSION_API_BASE_URL";
pub const TIMEOUT_MS_ENV: &str = "PENSION_API_TIMEOUT_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{name} must be a whole number of milliseconds, got '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    pub kind: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub health_timeout_secs: u64,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            kind: "http".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            health_timeout_secs: DEFAULT_HEALTH_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendSection,
    pub logging: LoggingSection,
    /// Set by env overrides; takes precedence over `timeout_secs`.
    #[serde(skip)]
    pub timeout_override: Option<Duration>,
}

impl AppConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `path` if it exists; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Applies overrides from a variable lookup (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.backend.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_MS_ENV) {
            let millis = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
                name: TIMEOUT_MS_ENV,
                value: raw.clone(),
            })?;
            self.timeout_override = Some(Duration::from_millis(millis));
        }
        Ok(())
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            kind: self.backend.kind.clone(),
            base_url: self.backend.base_url.clone(),
            timeout: self
                .timeout_override
                .unwrap_or(Duration::from_secs(self.backend.timeout_secs)),
            health_timeout: Duration::from_secs(self.backend.health_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("", Path::new("pension.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.backend_config(), BackendConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let text = r#"
            [backend]
            base_url = "https://pension.example.com"

            [logging]
            file = "pension.log"
        "#;
        let config = AppConfig::from_toml(text, Path::new("pension.toml")).unwrap();

        assert_eq!(config.backend.base_url, "https://pension.example.com");
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, Some(PathBuf::from("pension.log")));
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = AppConfig::from_toml("[backend\n", Path::new("broken.toml")).unwrap_err();

        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = AppConfig::load(Path::new("definitely/not/here.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn env_overrides_url_and_timeout() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                (BASE_URL_ENV, "http://api.internal:9000"),
                (TIMEOUT_MS_ENV, "2500"),
            ]))
            .unwrap();

        let backend = config.backend_config();
        assert_eq!(backend.base_url, "http://api.internal:9000");
        assert_eq!(backend.timeout, Duration::from_millis(2500));
        assert_eq!(backend.health_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_env_url_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[(BASE_URL_ENV, "  ")])).unwrap();

        assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[(TIMEOUT_MS_ENV, "ten seconds")]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }
}
