//! Configuration for the diversity engine.
//!
//! Tolerances used by equivalence search and alternative-team search, plus
//! the policy applied to degenerate qualitative domains.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Default tolerance for quantitative comparisons in equivalence search.
pub const DEFAULT_EQUIVALENCE_EPSILON: f64 = 1e-2;

/// Default minimum diversity shift for alternative-team search.
pub const DEFAULT_CHANGE_EPSILON: f64 = 0.1;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error while reading configuration.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration for [`DiversityEngine`](super::engine::DiversityEngine).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tolerance under which two quantitative values count as equal.
    pub equivalence_epsilon: f64,
    /// Minimum diversity shift an alternative team must achieve.
    pub change_epsilon: f64,
    /// Reject qualitative domains with fewer than two labels instead of
    /// scoring them 0.0.
    pub strict_domains: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            equivalence_epsilon: DEFAULT_EQUIVALENCE_EPSILON,
            change_epsilon: DEFAULT_CHANGE_EPSILON,
            strict_domains: false,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DIVERSITY_EQUIVALENCE_EPSILON`: Equivalence tolerance (default: 0.01)
    /// - `DIVERSITY_CHANGE_EPSILON`: Minimum diversity shift (default: 0.1)
    /// - `DIVERSITY_STRICT_DOMAINS`: Reject degenerate domains (default: false)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("DIVERSITY_EQUIVALENCE_EPSILON") {
            config.equivalence_epsilon = parse_env_value(&val, "DIVERSITY_EQUIVALENCE_EPSILON")?;
        }

        if let Ok(val) = std::env::var("DIVERSITY_CHANGE_EPSILON") {
            config.change_epsilon = parse_env_value(&val, "DIVERSITY_CHANGE_EPSILON")?;
        }

        if let Ok(val) = std::env::var("DIVERSITY_STRICT_DOMAINS") {
            config.strict_domains = parse_env_bool(&val, "DIVERSITY_STRICT_DOMAINS")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed or validated.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parses configuration from YAML text. Missing fields take defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.equivalence_epsilon.is_finite() || self.equivalence_epsilon < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "equivalence_epsilon must be a finite, non-negative number".to_string(),
            ));
        }

        if !self.change_epsilon.is_finite() || self.change_epsilon < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "change_epsilon must be a finite, non-negative number".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder method to set the equivalence tolerance.
    pub fn with_equivalence_epsilon(mut self, epsilon: f64) -> Self {
        self.equivalence_epsilon = epsilon;
        self
    }

    /// Builder method to set the minimum diversity shift.
    pub fn with_change_epsilon(mut self, epsilon: f64) -> Self {
        self.change_epsilon = epsilon;
        self
    }

    /// Builder method to set the degenerate domain policy.
    pub fn with_strict_domains(mut self, strict: bool) -> Self {
        self.strict_domains = strict;
        self
    }
}

/// Parses an environment variable value.
fn parse_env_value<T: std::str::FromStr>(val: &str, key: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    val.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Parses a boolean environment variable value.
fn parse_env_bool(val: &str, key: &str) -> Result<bool, ConfigError> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected boolean, got '{}'", val),
        }),
    }
}
