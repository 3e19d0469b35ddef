//! The deletable unit and its library linkage.

use serde::Serialize;

use crate::types::Timestamp;

/// A record in a library manager that references a download by hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryLink {
    /// Name of the library manager holding the record.
    pub library: String,
    /// Whether the library manager reports the item as fully imported.
    pub imported: bool,
}

/// A single deletable unit: a completed transfer plus its linkage to
/// library-manager records.
///
/// Items are rebuilt fresh on every run and never cached across runs.
/// An item with zero links is never eligible for deletion, regardless of
/// any other field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    /// Content hash, normalized to lowercase.
    pub hash: String,
    pub name: String,
    pub category: Option<String>,
    pub size_bytes: i64,
    /// When the download finished. Items still downloading are filtered out
    /// before they ever become items.
    pub completed_at: Option<Timestamp>,
    pub links: Vec<LibraryLink>,
}

impl Item {
    /// The link to the named library, if any. Library names are compared
    /// case-insensitively, matching the config's duplicate-name rule.
    pub fn link(&self, library: &str) -> Option<&LibraryLink> {
        self.links
            .iter()
            .find(|l| l.library.eq_ignore_ascii_case(library))
    }

    /// Days this item has been seeding since completion, as of `now`.
    pub fn seed_days(&self, now: Timestamp) -> Option<f64> {
        self.completed_at
            .map(|completed| (now - completed).num_seconds() as f64 / 86_400.0)
    }
}
