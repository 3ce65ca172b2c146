//! Point-in-time health telemetry consumed by the planner.
//!
//! A [`HealthSnapshot`] is an immutable value handed to the planner for one
//! call. Every field is optional: telemetry that is missing, stale, or
//! malformed is represented as `None` and resolved to a default by the
//! planner, never surfaced as an error.

mod error;
mod parser;

pub use error::SnapshotError;
pub use parser::{load_snapshot, parse_snapshot};

use crate::planner::{ChannelId, HealthClass, LivenessStatus, ProcessingMode};
use std::collections::BTreeMap;

/// Health snapshot for all channels plus system-wide aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthSnapshot {
    /// Per-channel liveness reports, keyed by channel id
    pub channels: BTreeMap<ChannelId, ChannelReport>,
    /// Scheduler-side telemetry, if the producer exposed any
    pub scheduler: Option<SchedulerTelemetry>,
}

/// Liveness report for one channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelReport {
    pub status: Option<LivenessStatus>,
}

/// Telemetry produced by the remote scheduler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerTelemetry {
    pub recommended_budgets: Option<RecommendedBudgets>,
    /// Per-channel reliability statistics
    pub channel_stats: BTreeMap<ChannelId, ChannelStats>,
    pub rolling: Option<RollingAggregates>,
}

/// Throughput budgets the scheduler recommends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendedBudgets {
    /// Budgets that apply to every channel
    pub global: ModeValues,
    /// Budgets for specific channels; take precedence over `global`
    pub per_channel: BTreeMap<ChannelId, ModeValues>,
}

/// One optional number per processing mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeValues(BTreeMap<ProcessingMode, f64>);

impl ModeValues {
    pub fn get(&self, mode: ProcessingMode) -> Option<f64> {
        self.0.get(&mode).copied()
    }

    pub fn set(&mut self, mode: ProcessingMode, value: f64) {
        self.0.insert(mode, value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reliability statistics for one channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelStats {
    pub health: Option<HealthClass>,
    pub rates: BTreeMap<ProcessingMode, ReliabilityRates>,
}

/// Rolling success/retry/timeout rates for one channel in one mode.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReliabilityRates {
    pub success_rate: Option<f64>,
    pub retry_rate: Option<f64>,
    pub timeout_rate: Option<f64>,
}

impl ReliabilityRates {
    pub fn new(success_rate: f64, retry_rate: f64, timeout_rate: f64) -> Self {
        Self {
            success_rate: Some(success_rate),
            retry_rate: Some(retry_rate),
            timeout_rate: Some(timeout_rate),
        }
    }
}

/// System-wide rolling aggregates across recent jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RollingAggregates {
    pub success_ratio: Option<f64>,
    pub fallback_rate: Option<f64>,
}

impl HealthSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reported liveness status of `channel`, if any.
    pub fn status(&self, channel: &ChannelId) -> Option<&LivenessStatus> {
        self.channels.get(channel).and_then(|r| r.status.as_ref())
    }

    /// Reliability statistics of `channel`, if the scheduler reported any.
    pub fn stats(&self, channel: &ChannelId) -> Option<&ChannelStats> {
        self.scheduler
            .as_ref()
            .and_then(|s| s.channel_stats.get(channel))
    }

    /// Health classification of `channel`, if reported.
    pub fn health(&self, channel: &ChannelId) -> Option<HealthClass> {
        self.stats(channel).and_then(|s| s.health)
    }

    pub fn channel_budget(&self, channel: &ChannelId, mode: ProcessingMode) -> Option<f64> {
        self.budgets()
            .and_then(|b| b.per_channel.get(channel))
            .and_then(|values| values.get(mode))
    }

    pub fn global_budget(&self, mode: ProcessingMode) -> Option<f64> {
        self.budgets().and_then(|b| b.global.get(mode))
    }

    pub fn rolling(&self) -> Option<&RollingAggregates> {
        self.scheduler.as_ref().and_then(|s| s.rolling.as_ref())
    }

    fn budgets(&self) -> Option<&RecommendedBudgets> {
        self.scheduler
            .as_ref()
            .and_then(|s| s.recommended_budgets.as_ref())
    }

    fn scheduler_mut(&mut self) -> &mut SchedulerTelemetry {
        self.scheduler.get_or_insert_with(SchedulerTelemetry::default)
    }

    fn budgets_mut(&mut self) -> &mut RecommendedBudgets {
        self.scheduler_mut()
            .recommended_budgets
            .get_or_insert_with(RecommendedBudgets::default)
    }

    fn stats_mut(&mut self, channel: impl Into<ChannelId>) -> &mut ChannelStats {
        self.scheduler_mut()
            .channel_stats
            .entry(channel.into())
            .or_default()
    }

    // Builders

    pub fn with_status(mut self, channel: impl Into<ChannelId>, status: &str) -> Self {
        self.channels.insert(
            channel.into(),
            ChannelReport {
                status: Some(LivenessStatus::parse(status)),
            },
        );
        self
    }

    pub fn with_health(mut self, channel: impl Into<ChannelId>, health: HealthClass) -> Self {
        self.stats_mut(channel).health = Some(health);
        self
    }

    pub fn with_rates(
        mut self,
        channel: impl Into<ChannelId>,
        mode: ProcessingMode,
        rates: ReliabilityRates,
    ) -> Self {
        self.stats_mut(channel).rates.insert(mode, rates);
        self
    }

    pub fn with_global_budget(mut self, mode: ProcessingMode, budget: f64) -> Self {
        self.budgets_mut().global.set(mode, budget);
        self
    }

    pub fn with_channel_budget(
        mut self,
        channel: impl Into<ChannelId>,
        mode: ProcessingMode,
        budget: f64,
    ) -> Self {
        self.budgets_mut()
            .per_channel
            .entry(channel.into())
            .or_default()
            .set(mode, budget);
        self
    }

    pub fn with_rolling(mut self, success_ratio: f64, fallback_rate: f64) -> Self {
        self.scheduler_mut().rolling = Some(RollingAggregates {
            success_ratio: Some(success_ratio),
            fallback_rate: Some(fallback_rate),
        });
        self
    }
}
