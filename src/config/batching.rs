//! Request batching configuration

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::schedule::BatchLimits;

/// Limits applied when slicing a job into requests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchingConfig {
    pub max_items_per_request: usize,
    pub max_words_per_request: u64,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            max_items_per_request: 80,
            max_words_per_request: 2200,
        }
    }
}

impl BatchingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_items_per_request == 0 {
            return Err(ConfigError::Validation {
                field: "batching.max_items_per_request".to_string(),
                message: "must be non-zero".to_string(),
            });
        }
        if self.max_words_per_request == 0 {
            return Err(ConfigError::Validation {
                field: "batching.max_words_per_request".to_string(),
                message: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

impl From<&BatchingConfig> for BatchLimits {
    fn from(config: &BatchingConfig) -> Self {
        BatchLimits {
            max_items_per_request: config.max_items_per_request,
            max_words_per_request: config.max_words_per_request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batching_config_defaults() {
        let config = BatchingConfig::default();
        assert_eq!(config.max_items_per_request, 80);
        assert_eq!(config.max_words_per_request, 2200);
        assert_eq!(BatchLimits::from(&config), BatchLimits::default());
    }

    #[test]
    fn test_batching_config_rejects_zero_limits() {
        let config = BatchingConfig {
            max_words_per_request: 0,
            ..BatchingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
