use std::{fmt::{self, Display}, fs, path::Path};

use serde::Deserialize;

/// Page size assumed when the read operator does not set `fetchSize`.
pub const DEFAULT_FETCH_SIZE: usize = 10_000;

/// Optimizer settings.
///
/// - `default_fetch_size` bounds how many rows one backend page may hold; a
///   `tail` larger than the active page size is never pushed down.
/// - `time_field` is the reserved timestamp field that may not be grouped by
///   or reduced into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PushdownConfig {
    pub default_fetch_size: usize,
    pub time_field: String,
}

impl Default for PushdownConfig {
    fn default() -> Self {
        Self { default_fetch_size: DEFAULT_FETCH_SIZE, time_field: "time".to_string() }
    }
}

impl PushdownConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fetch_size(default_fetch_size: usize) -> Self {
        Self { default_fetch_size, ..Self::default() }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| ConfigError::Json(e.to_string()))?;
        if config.default_fetch_size == 0 {
            return Err(ConfigError::Invalid("default_fetch_size must be positive".into()));
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Json(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "ConfigError: cannot read config ({})", msg),
            ConfigError::Json(msg) => write!(f, "ConfigError: invalid JSON ({})", msg),
            ConfigError::Invalid(msg) => write!(f, "ConfigError: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
