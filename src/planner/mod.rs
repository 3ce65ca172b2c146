//! Worker-activation planning
//!
//! Decides, before dispatch, how many worker channels a job should be split
//! across and which ones. Planning is a pure function of the job size, the
//! processing mode, and a borrowed [`HealthSnapshot`]: the planner holds no
//! mutable state, performs no I/O, and never fails.
//!
//! # Example
//!
//! ```rust
//! use paraplan::planner::{Planner, ProcessingMode};
//!
//! let planner = Planner::default();
//! let plan = planner.choose_workers(10_000.0, ProcessingMode::Dual, None);
//! assert_eq!(plan.worker_count, 3);
//! assert_eq!(plan.channels.len(), 3);
//! ```

pub mod channel;
pub mod mode;
pub mod reliability;
pub mod search;
pub mod tuning;

pub use channel::{ChannelId, HealthClass, LivenessStatus};
pub use mode::{ModeProfile, ProcessingMode};
pub use reliability::{budget_profiles, BudgetProfile};
pub use search::{CandidatePlan, SelectionResult};
pub use tuning::PlannerTuning;

use crate::telemetry::HealthSnapshot;
use tracing::{debug, warn};

/// Chooses worker plans for jobs.
///
/// Cheap to share: immutable after construction, so one instance can serve
/// concurrent callers with different snapshots.
#[derive(Debug, Clone)]
pub struct Planner {
    /// Fixed channel order; the first entry is the fallback channel
    channels: Vec<ChannelId>,
    tuning: PlannerTuning,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(ChannelId::default_set(), PlannerTuning::default())
    }
}

impl Planner {
    /// Create a planner over `channels`.
    ///
    /// An empty channel list is replaced by the reference channel set so a
    /// route always exists.
    pub fn new(channels: Vec<ChannelId>, tuning: PlannerTuning) -> Self {
        let channels = if channels.is_empty() {
            ChannelId::default_set()
        } else {
            channels
        };
        Self { channels, tuning }
    }

    pub fn channels(&self) -> &[ChannelId] {
        &self.channels
    }

    pub fn tuning(&self) -> &PlannerTuning {
        &self.tuning
    }

    /// Channel used whenever nothing better can be determined.
    pub fn fallback_channel(&self) -> &ChannelId {
        &self.channels[0]
    }

    /// Ranked budget profiles for the channels currently available.
    pub fn profiles(
        &self,
        mode: ProcessingMode,
        snapshot: Option<&HealthSnapshot>,
    ) -> Vec<BudgetProfile> {
        budget_profiles(&self.channels, mode, snapshot, &self.tuning)
    }

    /// Pick the worker plan with the lowest projected completion time.
    ///
    /// Always returns exactly one plan with at least one channel. A job size
    /// that is not a finite positive number yields the trivial plan.
    pub fn choose_workers(
        &self,
        total_words: f64,
        mode: ProcessingMode,
        snapshot: Option<&HealthSnapshot>,
    ) -> SelectionResult {
        if !total_words.is_finite() || total_words <= 0.0 {
            debug!(total_words, %mode, "Degenerate job size, using trivial plan");
            return self.trivial_plan(mode, 0.0);
        }

        let profiles = self.profiles(mode, snapshot);
        match search::select_plan(&profiles, total_words, mode, snapshot, &self.tuning) {
            Some(plan) => {
                debug!(
                    total_words,
                    %mode,
                    worker_count = plan.worker_count,
                    estimated_seconds = plan.estimated_seconds,
                    capacity = plan.capacity,
                    "Selected worker plan"
                );
                plan.into()
            }
            None => {
                warn!(total_words, %mode, "No candidate plans, using default channel");
                let profile = mode.profile();
                let estimated = total_words / profile.default_budget * profile.target_seconds;
                self.trivial_plan(mode, estimated)
            }
        }
    }

    fn trivial_plan(&self, mode: ProcessingMode, estimated_seconds: f64) -> SelectionResult {
        SelectionResult {
            worker_count: 1,
            channels: vec![self.fallback_channel().clone()],
            capacity: mode.profile().default_budget,
            estimated_seconds,
        }
    }
}
