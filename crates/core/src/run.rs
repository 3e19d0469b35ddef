//! Run modes, the confirmation token, and the immutable run result.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Timestamp;

/// How a run is performed. Simulate never calls a destructive operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Simulate,
    Execute,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Simulate => write!(f, "simulate"),
            RunMode::Execute => write!(f, "execute"),
        }
    }
}

/// Evidence that the caller confirmed a destructive run immediately before
/// requesting it.
///
/// Deliberately not `Clone`, `Default`, or deserializable: the only way to
/// obtain one is [`Confirmation::affirm`], called at the moment of
/// confirmation. Never cache one. An execute run without a confirmation is
/// treated the same as a gate denial.
#[derive(Debug)]
pub struct Confirmation {
    _guard: (),
}

impl Confirmation {
    /// Assert that the operator has just confirmed the destructive run.
    pub fn affirm() -> Self {
        Self { _guard: () }
    }
}

/// What happened (or would happen) to a single eligible item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Disposition {
    /// Simulate: the item would be deleted by an execute run.
    WouldDelete,
    /// Execute: the item was deleted.
    Deleted,
    /// Execute: the delete call failed; the run continued.
    Skipped { error: String },
}

/// Per-item entry in a library's run summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemOutcome {
    pub hash: String,
    pub name: String,
    pub size_bytes: i64,
    #[serde(flatten)]
    pub disposition: Disposition,
}

/// Per-library section of a run result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryOutcome {
    pub library: String,
    /// Eligible items, sorted by name (case-insensitive).
    pub items: Vec<ItemOutcome>,
    /// Set when this library could not be collected; its items were not
    /// evaluated this run.
    pub error: Option<String>,
}

/// The immutable record of one controller invocation.
///
/// The per-library summary is the authoritative record of what happened;
/// `deleted_count` is derived from it at construction and can never
/// disagree with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub mode: RunMode,
    pub started_at: Timestamp,
    pub libraries: Vec<LibraryOutcome>,
    pub deleted_count: usize,
    pub success: bool,
    pub error: Option<String>,
}

impl RunResult {
    /// A run that reached its terminal `Completed` state. Succeeds even
    /// when individual items were skipped -- their errors are carried in the
    /// summary so the caller sees exactly what happened.
    pub fn completed(
        run_id: Uuid,
        mode: RunMode,
        started_at: Timestamp,
        libraries: Vec<LibraryOutcome>,
    ) -> Self {
        let deleted_count = libraries
            .iter()
            .flat_map(|l| &l.items)
            .filter(|i| i.disposition == Disposition::Deleted)
            .count();
        Self {
            run_id,
            mode,
            started_at,
            libraries,
            deleted_count,
            success: true,
            error: None,
        }
    }

    /// A run that reached its terminal `Failed` state: gate denial, missing
    /// confirmation, or total collection failure. No deletions occurred.
    pub fn failed(run_id: Uuid, mode: RunMode, started_at: Timestamp, error: String) -> Self {
        Self {
            run_id,
            mode,
            started_at,
            libraries: Vec::new(),
            deleted_count: 0,
            success: false,
            error: Some(error),
        }
    }

    /// Count of items an execute run would delete (simulate summaries).
    pub fn would_delete_count(&self) -> usize {
        self.libraries
            .iter()
            .flat_map(|l| &l.items)
            .filter(|i| i.disposition == Disposition::WouldDelete)
            .count()
    }
}
