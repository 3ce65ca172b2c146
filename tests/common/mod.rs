//! Shared fixtures for paraplan integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Health endpoint body with every section populated.
///
/// acc3 is busy, acc2 is degraded with a poor dual-mode record, and acc1 has
/// its own dual budget above the global one.
pub const FULL_SNAPSHOT: &str = r#"{
  "acc1": {"status": "ready"},
  "acc2": {"status": "ok"},
  "acc3": {"status": "busy"},
  "scheduler": {
    "recommendedBudgets": {
      "dual": 520,
      "standard": 950,
      "ludicrous": 600,
      "perAccount": {
        "acc1": {"dual": 700}
      }
    },
    "accounts": {
      "acc2": {
        "health": "degraded",
        "successRateDual": 0.6,
        "retryRateDual": 0.3,
        "timeoutRateDual": 0.1
      }
    },
    "rolling": {"successRatio": 0.95, "fallbackRate": 0.02}
  }
}"#;

/// Snapshot in which only acc1 accepts work.
pub const SINGLE_CHANNEL_SNAPSHOT: &str = r#"{
  "acc1": {"status": "ready"},
  "acc2": {"status": "busy"},
  "acc3": {"status": "error"}
}"#;

/// Write `body` into `dir` and return the file path.
pub fn write_snapshot(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}
