//! Tunable weights and bounds used by the reliability model and plan search

use serde::{Deserialize, Serialize};

/// Numeric knobs for planning.
///
/// Defaults reproduce the reference deployment. Every field can be overridden
/// from the `[planner.tuning]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerTuning {
    /// Lower clamp for a resolved raw budget
    pub budget_floor: f64,
    /// Upper clamp for a resolved raw budget
    pub budget_ceiling: f64,
    /// Minimum effective budget after reliability discount
    pub effective_budget_floor: f64,
    /// Minimum summed capacity of a candidate plan
    pub capacity_floor: f64,
    /// Penalty per unit of retry rate
    pub retry_weight: f64,
    /// Penalty per unit of timeout rate
    pub timeout_weight: f64,
    pub rate_factor_min: f64,
    pub rate_factor_max: f64,
    /// Multiplier for channels classified `degraded`
    pub degraded_factor: f64,
    /// Multiplier for channels classified `tripped`
    pub tripped_factor: f64,
    pub reliability_min: f64,
    pub reliability_max: f64,
    /// Seconds per unit of rolling fallback rate, per extra channel
    pub fallback_penalty_weight: f64,
    /// Seconds per unit of rolling failure ratio, per extra channel
    pub failure_penalty_weight: f64,
    /// Improvement a larger plan must beat the incumbent by
    pub hysteresis_margin_seconds: f64,
}

impl Default for PlannerTuning {
    fn default() -> Self {
        Self {
            budget_floor: 120.0,
            budget_ceiling: 2000.0,
            effective_budget_floor: 120.0,
            capacity_floor: 100.0,
            retry_weight: 0.45,
            timeout_weight: 0.8,
            rate_factor_min: 0.4,
            rate_factor_max: 1.05,
            degraded_factor: 0.8,
            tripped_factor: 0.35,
            reliability_min: 0.35,
            reliability_max: 1.05,
            fallback_penalty_weight: 4.0,
            failure_penalty_weight: 6.0,
            hysteresis_margin_seconds: 0.9,
        }
    }
}

impl PlannerTuning {
    /// Check internal consistency. Returns the offending field and a message.
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        let fields = [
            ("budget_floor", self.budget_floor),
            ("budget_ceiling", self.budget_ceiling),
            ("effective_budget_floor", self.effective_budget_floor),
            ("capacity_floor", self.capacity_floor),
            ("retry_weight", self.retry_weight),
            ("timeout_weight", self.timeout_weight),
            ("rate_factor_min", self.rate_factor_min),
            ("rate_factor_max", self.rate_factor_max),
            ("degraded_factor", self.degraded_factor),
            ("tripped_factor", self.tripped_factor),
            ("reliability_min", self.reliability_min),
            ("reliability_max", self.reliability_max),
            ("fallback_penalty_weight", self.fallback_penalty_weight),
            ("failure_penalty_weight", self.failure_penalty_weight),
            ("hysteresis_margin_seconds", self.hysteresis_margin_seconds),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err((name, format!("must be a finite non-negative number, got {}", value)));
            }
        }

        for (name, value) in [
            ("budget_floor", self.budget_floor),
            ("effective_budget_floor", self.effective_budget_floor),
            ("capacity_floor", self.capacity_floor),
            ("reliability_min", self.reliability_min),
        ] {
            if value <= 0.0 {
                return Err((name, "must be greater than zero".to_string()));
            }
        }

        if self.budget_floor > self.budget_ceiling {
            return Err((
                "budget_ceiling",
                format!(
                    "must be at least budget_floor ({} > {})",
                    self.budget_floor, self.budget_ceiling
                ),
            ));
        }
        if self.rate_factor_min > self.rate_factor_max {
            return Err((
                "rate_factor_max",
                "must be at least rate_factor_min".to_string(),
            ));
        }
        if self.reliability_min > self.reliability_max {
            return Err((
                "reliability_max",
                "must be at least reliability_min".to_string(),
            ));
        }

        Ok(())
    }
}

/// `value` bounded to `[min, max]`.
///
/// Unlike `f64::clamp` this never panics on inverted bounds; `min` wins.
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}
