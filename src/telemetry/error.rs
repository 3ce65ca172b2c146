//! Errors raised while decoding a telemetry snapshot

use thiserror::Error;

/// Snapshot decoding failures.
///
/// Malformed individual fields never produce an error; they decode as absent.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse snapshot: {0}")]
    Parse(String),

    #[error("Snapshot must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}
