//! Planner configuration

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::error::ConfigError;
use crate::planner::{ChannelId, Planner, PlannerTuning, ProcessingMode};

/// Planner configuration
///
/// # Example
///
/// ```toml
/// [planner]
/// channels = ["acc1", "acc2", "acc3"]
/// default_mode = "standard"
///
/// [planner.tuning]
/// hysteresis_margin_seconds = 1.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Channel ids in priority order; the first is the fallback channel
    pub channels: Vec<String>,
    /// Mode used when a command does not specify one
    pub default_mode: ProcessingMode,
    pub tuning: PlannerTuning,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            channels: vec!["acc1".to_string(), "acc2".to_string(), "acc3".to_string()],
            default_mode: ProcessingMode::Dual,
            tuning: PlannerTuning::default(),
        }
    }
}

impl PlannerConfig {
    pub fn channel_ids(&self) -> Vec<ChannelId> {
        self.channels.iter().map(|c| ChannelId::new(c.as_str())).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::Validation {
                field: "planner.channels".to_string(),
                message: "at least one channel is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for (i, channel) in self.channels.iter().enumerate() {
            if channel.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("planner.channels[{}]", i),
                    message: "channel id cannot be empty".to_string(),
                });
            }
            if !seen.insert(channel.as_str()) {
                return Err(ConfigError::Validation {
                    field: format!("planner.channels[{}]", i),
                    message: format!("duplicate channel id '{}'", channel),
                });
            }
        }

        self.tuning
            .validate()
            .map_err(|(field, message)| ConfigError::Validation {
                field: format!("planner.tuning.{}", field),
                message,
            })
    }
}

impl From<&PlannerConfig> for Planner {
    fn from(config: &PlannerConfig) -> Self {
        Planner::new(config.channel_ids(), config.tuning)
    }
}
