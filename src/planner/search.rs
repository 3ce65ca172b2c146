//! Plan search: how many of the ranked channels to activate
//!
//! Candidates use the top-k budget profiles for k = 1..=K. A candidate with
//! more workers only displaces the incumbent when it is faster by more than
//! the hysteresis margin.

use super::channel::ChannelId;
use super::mode::ProcessingMode;
use super::reliability::BudgetProfile;
use super::tuning::{clamp, PlannerTuning};
use crate::telemetry::HealthSnapshot;
use serde::Serialize;
use tracing::debug;

/// A hypothetical activation of the top `worker_count` channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatePlan {
    pub worker_count: usize,
    pub channels: Vec<ChannelId>,
    pub capacity: f64,
    pub estimated_seconds: f64,
}

/// The plan handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionResult {
    pub worker_count: usize,
    pub channels: Vec<ChannelId>,
    /// Summed effective budget of the selected channels
    pub capacity: f64,
    pub estimated_seconds: f64,
}

impl From<CandidatePlan> for SelectionResult {
    fn from(plan: CandidatePlan) -> Self {
        Self {
            worker_count: plan.worker_count,
            channels: plan.channels,
            capacity: plan.capacity,
            estimated_seconds: plan.estimated_seconds,
        }
    }
}

/// Largest worker count worth evaluating.
///
/// Bounded by the number of available channels and by how many channels the
/// job can give at least `min_words_per_channel` words each. Never below 1.
pub fn max_candidate_count(available: usize, total_words: f64, mode: ProcessingMode) -> usize {
    let by_words = (total_words / mode.profile().min_words_per_channel).floor();
    let by_words = if by_words.is_finite() && by_words >= 1.0 {
        by_words as usize
    } else {
        1
    };
    available.min(by_words).max(1)
}

/// Extra seconds charged to a plan with `worker_count` channels when recent
/// system-wide reliability has been poor. Zero for single-channel plans.
pub fn system_penalty_seconds(
    snapshot: Option<&HealthSnapshot>,
    worker_count: usize,
    tuning: &PlannerTuning,
) -> f64 {
    if worker_count <= 1 {
        return 0.0;
    }
    let rolling = snapshot.and_then(HealthSnapshot::rolling);
    let success_ratio = clamp(
        rolling.and_then(|r| r.success_ratio).unwrap_or(1.0),
        0.0,
        1.0,
    );
    let fallback_rate = clamp(
        rolling.and_then(|r| r.fallback_rate).unwrap_or(0.0),
        0.0,
        1.0,
    );

    (fallback_rate * tuning.fallback_penalty_weight
        + (1.0 - success_ratio) * tuning.failure_penalty_weight)
        * (worker_count - 1) as f64
}

/// Cost of activating the first `worker_count` profiles.
///
/// `profiles` must be sorted fastest first. Returns `None` when
/// `worker_count` is zero or exceeds the number of profiles.
pub fn evaluate_candidate(
    profiles: &[BudgetProfile],
    worker_count: usize,
    total_words: f64,
    mode: ProcessingMode,
    snapshot: Option<&HealthSnapshot>,
    tuning: &PlannerTuning,
) -> Option<CandidatePlan> {
    if worker_count == 0 {
        return None;
    }
    let selected = profiles.get(..worker_count)?;
    let capacity = tuning
        .capacity_floor
        .max(selected.iter().map(|p| p.effective_budget).sum());
    let profile = mode.profile();

    let estimated_seconds = (total_words / capacity) * profile.target_seconds
        + (worker_count - 1) as f64 * profile.coordination_penalty_seconds
        + system_penalty_seconds(snapshot, worker_count, tuning);

    Some(CandidatePlan {
        worker_count,
        channels: selected.iter().map(|p| p.channel.clone()).collect(),
        capacity,
        estimated_seconds,
    })
}

/// Pick the best candidate among k = 1..=K, or `None` when `profiles` is empty.
pub fn select_plan(
    profiles: &[BudgetProfile],
    total_words: f64,
    mode: ProcessingMode,
    snapshot: Option<&HealthSnapshot>,
    tuning: &PlannerTuning,
) -> Option<CandidatePlan> {
    let max_count = max_candidate_count(profiles.len(), total_words, mode);
    let mut best = evaluate_candidate(profiles, 1, total_words, mode, snapshot, tuning)?;
    debug!(
        worker_count = 1,
        estimated_seconds = best.estimated_seconds,
        capacity = best.capacity,
        "Evaluated candidate plan"
    );

    for worker_count in 2..=max_count {
        let Some(candidate) =
            evaluate_candidate(profiles, worker_count, total_words, mode, snapshot, tuning)
        else {
            break;
        };
        debug!(
            worker_count,
            estimated_seconds = candidate.estimated_seconds,
            capacity = candidate.capacity,
            "Evaluated candidate plan"
        );
        if candidate.estimated_seconds + tuning.hysteresis_margin_seconds
            < best.estimated_seconds
        {
            best = candidate;
        }
    }

    Some(best)
}
