//! The safety gate consulted before any destructive run.
//!
//! Stateless: a pure function of the candidate count, the total managed
//! count, and the config snapshot. Simulate runs bypass the gate entirely --
//! a simulation performs no destructive call and must always be computable.

use std::fmt;

use crate::config::{Config, Environment};

/// Why the gate refused a destructive run. Reported verbatim to the caller
/// and never retried automatically.
#[derive(Debug, Clone, PartialEq)]
pub enum Denial {
    /// Global dry-run is on. A disciplined caller never reaches the gate in
    /// this state; the gate still enforces it.
    DryRun,
    /// The environment cannot be trusted for deletion (no override).
    UnsafeEnvironment(Environment),
    /// The candidate set is too large a fraction of the managed set.
    CeilingExceeded { percent: f64, ceiling: f64 },
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::DryRun => write!(f, "dry-run is enabled; execute is not permitted"),
            Denial::UnsafeEnvironment(env) => {
                write!(f, "deletion is disabled in the '{env}' environment")
            }
            Denial::CeilingExceeded { percent, ceiling } => write!(
                f,
                "candidates are {percent:.1}% of managed items, above the {ceiling:.1}% ceiling"
            ),
        }
    }
}

/// Outcome of a gate check.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Authorized,
    Denied(Denial),
}

/// Authorize or deny a destructive run.
///
/// Denial rules are evaluated in order, first match wins:
/// 1. global `dry_run`;
/// 2. an environment that does not allow deletion;
/// 3. candidates exceed `max_delete_percent` of `total`.
pub fn authorize(candidates: usize, total: usize, config: &Config) -> GateDecision {
    if config.dry_run {
        return GateDecision::Denied(Denial::DryRun);
    }

    if !config.environment.allows_deletion() {
        return GateDecision::Denied(Denial::UnsafeEnvironment(config.environment));
    }

    if let Some(ceiling) = config.max_delete_percent {
        if total > 0 {
            let percent = candidates as f64 / total as f64 * 100.0;
            if percent > ceiling {
                return GateDecision::Denied(Denial::CeilingExceeded { percent, ceiling });
            }
        }
    }

    GateDecision::Authorized
}
