//! Processing modes and their static planning constants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text-processing mode requested for a job.
///
/// Each mode carries a fixed [`ModeProfile`]; the constants are design-time
/// values, not runtime state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Simple + short rewrite, the slowest per word
    #[default]
    Dual,
    /// Single-pass rewrite
    Standard,
    /// Aggressive rewrite
    Ludicrous,
}

/// Static tunables attached to a [`ProcessingMode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeProfile {
    /// Throughput budget assumed when telemetry recommends nothing
    pub default_budget: f64,
    /// Seconds a single channel needs for a job of `default_budget` words
    pub target_seconds: f64,
    /// Minimum words that justify activating one more channel
    pub min_words_per_channel: f64,
    /// Upper bound on words sent to a lone channel in one request
    pub max_words_per_channel: u64,
    /// Seconds charged once per additional active channel
    pub coordination_penalty_seconds: f64,
}

const DUAL: ModeProfile = ModeProfile {
    default_budget: 520.0,
    target_seconds: 18.0,
    min_words_per_channel: 280.0,
    max_words_per_channel: 760,
    coordination_penalty_seconds: 1.2,
};

const STANDARD: ModeProfile = ModeProfile {
    default_budget: 950.0,
    target_seconds: 9.0,
    min_words_per_channel: 500.0,
    max_words_per_channel: 1400,
    coordination_penalty_seconds: 0.7,
};

const LUDICROUS: ModeProfile = ModeProfile {
    default_budget: 600.0,
    target_seconds: 16.0,
    min_words_per_channel: 300.0,
    max_words_per_channel: 900,
    coordination_penalty_seconds: 1.0,
};

impl ProcessingMode {
    /// All modes, in declaration order.
    pub const ALL: [ProcessingMode; 3] = [
        ProcessingMode::Dual,
        ProcessingMode::Standard,
        ProcessingMode::Ludicrous,
    ];

    pub fn profile(self) -> &'static ModeProfile {
        match self {
            ProcessingMode::Dual => &DUAL,
            ProcessingMode::Standard => &STANDARD,
            ProcessingMode::Ludicrous => &LUDICROUS,
        }
    }

    /// Lowercase name as it appears in telemetry budget maps.
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingMode::Dual => "dual",
            ProcessingMode::Standard => "standard",
            ProcessingMode::Ludicrous => "ludicrous",
        }
    }

    /// Suffix used by per-channel rate keys, e.g. `successRateDual`.
    pub fn rate_suffix(self) -> &'static str {
        match self {
            ProcessingMode::Dual => "Dual",
            ProcessingMode::Standard => "Standard",
            ProcessingMode::Ludicrous => "Ludicrous",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dual" | "simple" | "simple+short" | "simple-short" | "fast" => {
                Ok(ProcessingMode::Dual)
            }
            "standard" | "std" => Ok(ProcessingMode::Standard),
            "ludicrous" => Ok(ProcessingMode::Ludicrous),
            _ => Err(format!("Invalid processing mode: {}", s)),
        }
    }
}
