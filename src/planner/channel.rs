//! Channel identity and the liveness/health vocabulary reported for channels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical worker slot a job can be routed through.
///
/// A channel has no identity beyond its key; all per-channel state is derived
/// from a [`HealthSnapshot`](crate::telemetry::HealthSnapshot) on each call.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reference deployment's three channels, in priority order.
    pub fn default_set() -> Vec<ChannelId> {
        ["acc1", "acc2", "acc3"].into_iter().map(ChannelId::new).collect()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Liveness status reported by the health endpoint for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LivenessStatus {
    Ready,
    Ok,
    Busy,
    Error,
    Initializing,
    /// A status string the planner does not recognize
    Unrecognized(String),
}

impl LivenessStatus {
    /// Case-insensitive parse; never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "ready" => LivenessStatus::Ready,
            "ok" => LivenessStatus::Ok,
            "busy" => LivenessStatus::Busy,
            "error" => LivenessStatus::Error,
            "initializing" => LivenessStatus::Initializing,
            other => LivenessStatus::Unrecognized(other.to_string()),
        }
    }

    /// Whether a channel with this status may receive work.
    ///
    /// Unrecognized statuses fail open.
    pub fn accepts_work(&self) -> bool {
        matches!(
            self,
            LivenessStatus::Ready | LivenessStatus::Ok | LivenessStatus::Unrecognized(_)
        )
    }
}

/// Coarse health classification assigned by the remote scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthClass {
    #[default]
    Normal,
    Degraded,
    Tripped,
}

impl HealthClass {
    /// Case-insensitive parse; anything unknown is treated as normal.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "degraded" => HealthClass::Degraded,
            "tripped" => HealthClass::Tripped,
            _ => HealthClass::Normal,
        }
    }
}
