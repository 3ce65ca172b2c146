//! Reliability model: turns a telemetry snapshot into ranked per-channel budgets
//!
//! All functions here are pure. Missing telemetry resolves to a neutral
//! default; extreme telemetry is clamped so no single value can dominate.

use super::channel::{ChannelId, HealthClass};
use super::mode::ProcessingMode;
use super::tuning::{clamp, PlannerTuning};
use crate::telemetry::HealthSnapshot;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::warn;

/// Throughput estimate for one channel in one planning call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProfile {
    pub channel: ChannelId,
    /// Resolved and clamped throughput estimate
    pub raw_budget: f64,
    /// Multiplier derived from the channel's track record
    pub reliability: f64,
    /// `raw_budget * reliability`, floored
    pub effective_budget: f64,
}

/// Channels eligible to receive work, in the fixed channel order.
///
/// Never empty as long as `channels` is not: with nothing ready the first
/// channel is returned, and with every ready channel tripped the first ready
/// channel is returned.
pub fn available_channels(
    channels: &[ChannelId],
    snapshot: Option<&HealthSnapshot>,
) -> Vec<ChannelId> {
    let Some(snapshot) = snapshot else {
        return channels.to_vec();
    };

    let ready: Vec<&ChannelId> = channels
        .iter()
        .filter(|channel| {
            snapshot
                .status(channel)
                .map_or(true, |status| status.accepts_work())
        })
        .collect();

    if ready.is_empty() {
        warn!(
            fallback = channels.first().map(ChannelId::as_str),
            "No channel reports ready, falling back to default channel"
        );
        return channels.iter().take(1).cloned().collect();
    }

    let untripped: Vec<ChannelId> = ready
        .iter()
        .filter(|channel| snapshot.health(channel) != Some(HealthClass::Tripped))
        .map(|channel| (*channel).clone())
        .collect();

    if untripped.is_empty() {
        warn!(
            fallback = ready[0].as_str(),
            "Every ready channel is tripped, keeping first ready channel"
        );
        return vec![ready[0].clone()];
    }

    untripped
}

/// Recommended throughput for `channel`, clamped to the tuning range.
///
/// Precedence: per-channel budget, then global budget, then the mode default.
/// Telemetry values that are not strictly positive are ignored.
pub fn raw_budget(
    snapshot: Option<&HealthSnapshot>,
    channel: &ChannelId,
    mode: ProcessingMode,
    tuning: &PlannerTuning,
) -> f64 {
    let recommended = snapshot.and_then(|snapshot| {
        usable_budget(snapshot.channel_budget(channel, mode))
            .or_else(|| usable_budget(snapshot.global_budget(mode)))
    });
    let budget = recommended.unwrap_or(mode.profile().default_budget);
    clamp(budget, tuning.budget_floor, tuning.budget_ceiling)
}

fn usable_budget(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Throughput multiplier for `channel` from its reliability stats.
///
/// Channels without stats are neutral (1.0). The result is always within
/// `[reliability_min, reliability_max]` and therefore strictly positive.
pub fn reliability_factor(
    snapshot: Option<&HealthSnapshot>,
    channel: &ChannelId,
    mode: ProcessingMode,
    tuning: &PlannerTuning,
) -> f64 {
    let Some(stats) = snapshot.and_then(|s| s.stats(channel)) else {
        return 1.0;
    };

    let rates = stats.rates.get(&mode).copied().unwrap_or_default();
    let success = rates.success_rate.unwrap_or(1.0);
    let retry = rates.retry_rate.unwrap_or(0.0);
    let timeout = rates.timeout_rate.unwrap_or(0.0);

    let rate_factor = clamp(
        success - retry * tuning.retry_weight - timeout * tuning.timeout_weight,
        tuning.rate_factor_min,
        tuning.rate_factor_max,
    );

    let health_factor = match stats.health {
        Some(HealthClass::Degraded) => tuning.degraded_factor,
        Some(HealthClass::Tripped) => tuning.tripped_factor,
        Some(HealthClass::Normal) | None => 1.0,
    };

    clamp(
        rate_factor * health_factor,
        tuning.reliability_min,
        tuning.reliability_max,
    )
}

/// Budget profiles for every available channel, fastest first.
///
/// Ties keep the fixed channel order.
pub fn budget_profiles(
    channels: &[ChannelId],
    mode: ProcessingMode,
    snapshot: Option<&HealthSnapshot>,
    tuning: &PlannerTuning,
) -> Vec<BudgetProfile> {
    let mut profiles: Vec<BudgetProfile> = available_channels(channels, snapshot)
        .into_iter()
        .map(|channel| {
            let raw_budget = raw_budget(snapshot, &channel, mode, tuning);
            let reliability = reliability_factor(snapshot, &channel, mode, tuning);
            let effective_budget = tuning
                .effective_budget_floor
                .max(raw_budget * reliability);
            BudgetProfile {
                channel,
                raw_budget,
                reliability,
                effective_budget,
            }
        })
        .collect();

    profiles.sort_by(|a, b| {
        b.effective_budget
            .partial_cmp(&a.effective_budget)
            .unwrap_or(Ordering::Equal)
    });
    profiles
}
