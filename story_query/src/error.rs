//! Acquisition errors and the degraded-join condition.

use std::path::PathBuf;
use thiserror::Error;

use story_catalog::RecordError;

/// The primary story resource could not be used. Fatal to initialization.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to load {}: {source}", path.display())]
    Unreachable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("story data is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("story data must be a JSON array of records")]
    NotAnArray,
    #[error("story record #{position} is invalid: {source}")]
    InvalidRecord {
        position: usize,
        #[source]
        source: RecordError,
    },
    #[error("failed to start the acquisition runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Why the auxiliary link source was left out of the join.
///
/// This is not an error: the catalog stays fully usable with every link
/// field absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedJoin {
    Unreachable(String),
    Malformed(String),
    NotProvided,
}

impl std::fmt::Display for DegradedJoin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradedJoin::Unreachable(reason) => write!(f, "link data unreachable: {}", reason),
            DegradedJoin::Malformed(reason) => write!(f, "link data malformed: {}", reason),
            DegradedJoin::NotProvided => write!(f, "no link data provided"),
        }
    }
}

/// Outcome of the join step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JoinStatus {
    #[default]
    Complete,
    Degraded(DegradedJoin),
}

impl JoinStatus {
    /// Whether the join ran without link data.
    pub fn is_degraded(&self) -> bool {
        matches!(self, JoinStatus::Degraded(_))
    }
}
