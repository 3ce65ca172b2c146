//! Snapshot decoding against realistic health endpoint bodies.

mod common;

use paraplan::planner::{budget_profiles, ChannelId, HealthClass, PlannerTuning, ProcessingMode};
use paraplan::telemetry::{load_snapshot, parse_snapshot, SnapshotError};

#[test]
fn test_full_snapshot_decodes_every_section() {
    let snapshot = parse_snapshot(common::FULL_SNAPSHOT).unwrap();
    let acc1 = ChannelId::new("acc1");
    let acc2 = ChannelId::new("acc2");
    let acc3 = ChannelId::new("acc3");

    assert!(snapshot.status(&acc1).unwrap().accepts_work());
    assert!(!snapshot.status(&acc3).unwrap().accepts_work());
    assert_eq!(snapshot.global_budget(ProcessingMode::Standard), Some(950.0));
    assert_eq!(snapshot.channel_budget(&acc1, ProcessingMode::Dual), Some(700.0));
    assert_eq!(snapshot.channel_budget(&acc1, ProcessingMode::Standard), None);
    assert_eq!(snapshot.health(&acc2), Some(HealthClass::Degraded));

    let rolling = snapshot.rolling().unwrap();
    assert_eq!(rolling.success_ratio, Some(0.95));
    assert_eq!(rolling.fallback_rate, Some(0.02));
}

#[test]
fn test_full_snapshot_ranks_channels() {
    let snapshot = parse_snapshot(common::FULL_SNAPSHOT).unwrap();
    let profiles = budget_profiles(
        &ChannelId::default_set(),
        ProcessingMode::Dual,
        Some(&snapshot),
        &PlannerTuning::default(),
    );

    let order: Vec<&str> = profiles.iter().map(|p| p.channel.as_str()).collect();
    assert_eq!(order, vec!["acc1", "acc2"]);
    assert_eq!(profiles[0].raw_budget, 700.0);
    assert!(profiles[1].reliability < 1.0);
}

#[test]
fn test_wrongly_typed_fields_are_absent() {
    let body = r#"{
      "acc1": {"status": 7},
      "scheduler": {
        "recommendedBudgets": {"dual": "fast"},
        "rolling": {"successRatio": null}
      }
    }"#;
    let snapshot = parse_snapshot(body).unwrap();
    assert!(snapshot.status(&ChannelId::new("acc1")).is_none());
    assert_eq!(snapshot.global_budget(ProcessingMode::Dual), None);
    assert_eq!(snapshot.rolling().unwrap().success_ratio, None);
}

#[test]
fn test_non_object_body_is_rejected() {
    assert!(matches!(
        parse_snapshot("[1, 2, 3]"),
        Err(SnapshotError::NotAnObject(_))
    ));
    assert!(matches!(parse_snapshot("{"), Err(SnapshotError::Parse(_))));
}

#[test]
fn test_load_snapshot_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_snapshot(dir.path(), "health.json", common::SINGLE_CHANNEL_SNAPSHOT);
    let snapshot = load_snapshot(&path).unwrap();
    assert_eq!(snapshot.channels.len(), 3);

    let missing = load_snapshot(&dir.path().join("missing.json"));
    assert!(matches!(missing, Err(SnapshotError::Io(_))));
}
