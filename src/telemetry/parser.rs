//! Lenient decoding of the health endpoint body into a [`HealthSnapshot`].

use super::error::SnapshotError;
use super::{
    ChannelReport, ChannelStats, HealthSnapshot, ModeValues, RecommendedBudgets,
    ReliabilityRates, RollingAggregates, SchedulerTelemetry,
};
use crate::planner::{ChannelId, HealthClass, LivenessStatus, ProcessingMode};
use serde_json::{Map, Value};
use std::path::Path;

const SCHEDULER_KEY: &str = "scheduler";
const PER_CHANNEL_KEY: &str = "perAccount";

/// Decode a snapshot from a JSON document.
///
/// Only a body that is not valid JSON, or not a JSON object, is an error.
/// Every field with an unexpected type decodes as absent.
pub fn parse_snapshot(body: &str) -> Result<HealthSnapshot, SnapshotError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| SnapshotError::Parse(e.to_string()))?;
    let root = match &value {
        Value::Object(map) => map,
        other => return Err(SnapshotError::NotAnObject(json_type_name(other))),
    };

    let channels = root
        .iter()
        .filter(|(key, _)| key.as_str() != SCHEDULER_KEY)
        .filter_map(|(key, value)| {
            let report = value.as_object()?;
            Some((ChannelId::new(key.as_str()), parse_channel_report(report)))
        })
        .collect();

    let scheduler = root
        .get(SCHEDULER_KEY)
        .and_then(Value::as_object)
        .map(parse_scheduler);

    Ok(HealthSnapshot {
        channels,
        scheduler,
    })
}

/// Read and decode a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<HealthSnapshot, SnapshotError> {
    let body = std::fs::read_to_string(path)?;
    parse_snapshot(&body)
}

fn parse_channel_report(report: &Map<String, Value>) -> ChannelReport {
    let status = report
        .get("status")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(LivenessStatus::parse);
    ChannelReport { status }
}

fn parse_scheduler(scheduler: &Map<String, Value>) -> SchedulerTelemetry {
    let recommended_budgets = scheduler
        .get("recommendedBudgets")
        .and_then(Value::as_object)
        .map(parse_budgets);

    let channel_stats = scheduler
        .get("accounts")
        .and_then(Value::as_object)
        .map(|accounts| {
            accounts
                .iter()
                .filter_map(|(key, value)| {
                    let stats = value.as_object()?;
                    Some((ChannelId::new(key.as_str()), parse_channel_stats(stats)))
                })
                .collect()
        })
        .unwrap_or_default();

    let rolling = scheduler
        .get("rolling")
        .and_then(Value::as_object)
        .map(|rolling| RollingAggregates {
            success_ratio: finite_number(rolling.get("successRatio")),
            fallback_rate: finite_number(rolling.get("fallbackRate")),
        });

    SchedulerTelemetry {
        recommended_budgets,
        channel_stats,
        rolling,
    }
}

fn parse_budgets(budgets: &Map<String, Value>) -> RecommendedBudgets {
    let per_channel = budgets
        .get(PER_CHANNEL_KEY)
        .and_then(Value::as_object)
        .map(|per_channel| {
            per_channel
                .iter()
                .filter_map(|(key, value)| {
                    let values = value.as_object()?;
                    Some((ChannelId::new(key.as_str()), parse_mode_values(values)))
                })
                .collect()
        })
        .unwrap_or_default();

    RecommendedBudgets {
        global: parse_mode_values(budgets),
        per_channel,
    }
}

fn parse_mode_values(values: &Map<String, Value>) -> ModeValues {
    let mut out = ModeValues::default();
    for mode in ProcessingMode::ALL {
        if let Some(value) = finite_number(values.get(mode.as_str())) {
            out.set(mode, value);
        }
    }
    out
}

fn parse_channel_stats(stats: &Map<String, Value>) -> ChannelStats {
    let health = stats
        .get("health")
        .and_then(Value::as_str)
        .map(HealthClass::parse);

    let rates = ProcessingMode::ALL
        .into_iter()
        .filter_map(|mode| {
            let suffix = mode.rate_suffix();
            let rates = ReliabilityRates {
                success_rate: finite_number(stats.get(&format!("successRate{}", suffix))),
                retry_rate: finite_number(stats.get(&format!("retryRate{}", suffix))),
                timeout_rate: finite_number(stats.get(&format!("timeoutRate{}", suffix))),
            };
            (rates != ReliabilityRates::default()).then_some((mode, rates))
        })
        .collect();

    ChannelStats { health, rates }
}

fn finite_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_SNAPSHOT: &str = r#"{
        "acc1": { "status": "ready" },
        "acc2": { "status": "BUSY" },
        "acc3": { "status": "" },
        "version": "1.4.2",
        "scheduler": {
            "recommendedBudgets": {
                "dual": 540,
                "standard": "fast",
                "perAccount": { "acc1": { "dual": 640.5 }, "acc2": 12 }
            },
            "accounts": {
                "acc1": {
                    "health": "degraded",
                    "successRateDual": 0.9,
                    "retryRateDual": 0.1,
                    "timeoutRateDual": null
                },
                "acc3": { "health": "tripped" }
            },
            "rolling": { "successRatio": 0.97, "fallbackRate": "n/a" }
        }
    }"#;

    #[test]
    fn parses_channel_statuses() {
        let snapshot = parse_snapshot(FULL_SNAPSHOT).unwrap();
        assert_eq!(
            snapshot.status(&ChannelId::new("acc1")),
            Some(&LivenessStatus::Ready)
        );
        assert_eq!(
            snapshot.status(&ChannelId::new("acc2")),
            Some(&LivenessStatus::Busy)
        );
        // Empty status decodes as absent
        assert!(snapshot.status(&ChannelId::new("acc3")).is_none());
        // Non-object top-level values are not channels
        assert!(!snapshot.channels.contains_key(&ChannelId::new("version")));
    }

    #[test]
    fn parses_budgets_and_drops_wrong_types() {
        let snapshot = parse_snapshot(FULL_SNAPSHOT).unwrap();
        assert_eq!(snapshot.global_budget(ProcessingMode::Dual), Some(540.0));
        assert!(snapshot.global_budget(ProcessingMode::Standard).is_none());
        assert_eq!(
            snapshot.channel_budget(&ChannelId::new("acc1"), ProcessingMode::Dual),
            Some(640.5)
        );
        assert!(snapshot
            .channel_budget(&ChannelId::new("acc2"), ProcessingMode::Dual)
            .is_none());
    }

    #[test]
    fn parses_channel_stats() {
        let snapshot = parse_snapshot(FULL_SNAPSHOT).unwrap();
        let acc1 = snapshot.stats(&ChannelId::new("acc1")).unwrap();
        assert_eq!(acc1.health, Some(HealthClass::Degraded));
        let dual = acc1.rates.get(&ProcessingMode::Dual).unwrap();
        assert_eq!(dual.success_rate, Some(0.9));
        assert_eq!(dual.retry_rate, Some(0.1));
        assert_eq!(dual.timeout_rate, None);
        assert!(!acc1.rates.contains_key(&ProcessingMode::Standard));

        assert_eq!(
            snapshot.health(&ChannelId::new("acc3")),
            Some(HealthClass::Tripped)
        );
    }

    #[test]
    fn parses_rolling_aggregates_leniently() {
        let snapshot = parse_snapshot(FULL_SNAPSHOT).unwrap();
        let rolling = snapshot.rolling().unwrap();
        assert_eq!(rolling.success_ratio, Some(0.97));
        assert_eq!(rolling.fallback_rate, None);
    }

    #[test]
    fn non_object_scheduler_is_absent() {
        let snapshot = parse_snapshot(r#"{"scheduler": [1, 2, 3]}"#).unwrap();
        assert!(snapshot.scheduler.is_none());
    }

    #[test]
    fn empty_object_is_empty_snapshot() {
        let snapshot = parse_snapshot("{}").unwrap();
        assert_eq!(snapshot, HealthSnapshot::default());
    }

    #[test]
    fn rejects_non_object_body() {
        let result = parse_snapshot("[1, 2]");
        assert!(matches!(result, Err(SnapshotError::NotAnObject("array"))));
    }

    #[test]
    fn rejects_invalid_json() {
        let result = parse_snapshot("{not json");
        assert!(matches!(result, Err(SnapshotError::Parse(_))));
    }

    #[test]
    fn load_snapshot_reads_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), r#"{"acc1": {"status": "error"}}"#).unwrap();

        let snapshot = load_snapshot(temp.path()).unwrap();
        assert_eq!(
            snapshot.status(&ChannelId::new("acc1")),
            Some(&LivenessStatus::Error)
        );
    }

    #[test]
    fn load_snapshot_missing_file_is_io_error() {
        let result = load_snapshot(Path::new("/nonexistent/snapshot.json"));
        assert!(matches!(result, Err(SnapshotError::Io(_))));
    }
}
