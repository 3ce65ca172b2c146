//! Configuration module for paraplan
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PARAPLAN_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use paraplan::config::ParaplanConfig;
//!
//! // Load defaults
//! let config = ParaplanConfig::default();
//! assert_eq!(config.planner.channels.len(), 3);
//!
//! // Parse from TOML
//! let toml = r#"
//! [planner]
//! channels = ["east", "west"]
//! "#;
//! let config: ParaplanConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.planner.channels, vec!["east", "west"]);
//! ```

pub mod batching;
pub mod error;
pub mod logging;
pub mod planner;

pub use batching::BatchingConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use planner::PlannerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParaplanConfig {
    /// Channel set, default mode and tuning
    pub planner: PlannerConfig,
    /// Request slicing limits
    pub batching: BatchingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ParaplanConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports PARAPLAN_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("PARAPLAN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PARAPLAN_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(mode) = std::env::var("PARAPLAN_MODE") {
            if let Ok(m) = mode.parse() {
                self.planner.default_mode = m;
            }
        }
        if let Ok(channels) = std::env::var("PARAPLAN_CHANNELS") {
            let parsed: Vec<String> = channels
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect();
            if !parsed.is_empty() {
                self.planner.channels = parsed;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.planner.validate()?;
        self.batching.validate()?;
        Ok(())
    }
}
