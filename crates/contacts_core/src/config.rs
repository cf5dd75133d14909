//! Application configuration.
//!
//! # Responsibility
//! - Decode `contacts.toml` settings with defaults for every field.
//! - Reject values the composition root cannot honour.
//!
//! # Invariants
//! - Unknown keys are rejected instead of being silently ignored.
//! - `validate()` runs before any value is used.

use crate::navigation::view_stack::Transition;
use crate::routing::router::LIST_ROUTE;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings consumed by `ContactsApp::launch`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Route dispatched right after launch.
    pub default_route: String,
    /// Card switch animation used when a dispatch carries no hint.
    pub transition: Transition,
    /// Fails a directory load after this many milliseconds; unset = wait forever.
    pub load_timeout_ms: Option<u64>,
    /// `trace|debug|info|warn|error`; build-mode default when unset.
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_route: LIST_ROUTE.to_string(),
            transition: Transition::Slide,
            load_timeout_ms: None,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_route.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_route cannot be empty".to_string(),
            ));
        }
        if self.load_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "load_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms.map(Duration::from_millis)
    }
}

/// Configuration loading error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}
