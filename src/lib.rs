//! paraplan - worker-channel activation planning
//!
//! Decides how many worker channels a text-processing job should be spread
//! across, using per-channel throughput budgets discounted by each channel's
//! recent reliability, and slices whole jobs into planned requests.

pub mod cli;
pub mod config;
pub mod logging;
pub mod planner;
pub mod schedule;
pub mod telemetry;
