use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_MAX_MASK, DEFAULT_MIN_LIVENESS, DEFAULT_MIN_QUALITY, DEFAULT_SIMILARITY_THRESHOLD,
    MAX_MASK_ENV, MIN_LIVENESS_ENV, MIN_QUALITY_ENV, SIMILARITY_THRESHOLD_ENV,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    InvalidValue { key: String, value: String },
    #[error("{key} must be between 0.0 and 1.0, got {value}")]
    OutOfRange { key: String, value: f64 },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Process-wide decision thresholds.
///
/// Resolved once at startup and passed by value into each use case; nothing
/// downstream mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub min_quality: f64,
    pub min_liveness: f64,
    pub max_mask: f64,
    pub similarity_threshold: f64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_quality: DEFAULT_MIN_QUALITY,
            min_liveness: DEFAULT_MIN_LIVENESS,
            max_mask: DEFAULT_MAX_MASK,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl AuthConfig {
    /// Defaults overridden by the `FACE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Reads a JSON file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Applies every variable `lookup` knows about on top of `self`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut f64); 4] = [
            (MIN_QUALITY_ENV, &mut self.min_quality),
            (MIN_LIVENESS_ENV, &mut self.min_liveness),
            (MAX_MASK_ENV, &mut self.max_mask),
            (SIMILARITY_THRESHOLD_ENV, &mut self.similarity_threshold),
        ];
        for (key, field) in fields {
            if let Some(raw) = lookup(key) {
                *field = parse_value(key, &raw)?;
            }
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            (MIN_QUALITY_ENV, self.min_quality),
            (MIN_LIVENESS_ENV, self.min_liveness),
            (MAX_MASK_ENV, self.max_mask),
            (SIMILARITY_THRESHOLD_ENV, self.similarity_threshold),
        ];
        for (key, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    key: key.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

fn parse_value(key: &str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        })
}
