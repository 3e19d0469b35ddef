//! Bounded in-memory narration log.
//!
//! An append-only ring of timestamped lines describing what a run did,
//! exposed over the API for the operator console. Observability only --
//! never authoritative state. When full, the oldest entries are dropped
//! first.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Retained line count, matching the original console depth.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// Thread-safe bounded narration buffer.
#[derive(Debug)]
pub struct ExecutionLog {
    capacity: usize,
    entries: Mutex<VecDeque<String>>,
}

impl Default for ExecutionLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl ExecutionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append a line, stamped with the current UTC time. Drops the oldest
    /// line when the buffer is at capacity.
    pub fn push(&self, line: impl AsRef<str>) {
        let stamped = format!(
            "{} {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"),
            line.as_ref()
        );
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(stamped);
    }

    /// All retained lines, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
