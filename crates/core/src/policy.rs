//! Eligibility policy evaluation.
//!
//! Pure and deterministic: the same item, library config, and clock always
//! produce the same verdict, so runs can be replayed in tests. Rules are
//! applied in a fixed order and the first failing rule short-circuits with
//! its reason recorded.

use serde::Serialize;

use crate::config::LibraryConfig;
use crate::item::Item;
use crate::types::Timestamp;

/// Per-item verdict. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityResult {
    pub eligible: bool,
    /// Ordered explanation of why the item was included or excluded.
    pub reasons: Vec<String>,
}

impl EligibilityResult {
    fn excluded(reasons: Vec<String>, reason: String) -> Self {
        let mut reasons = reasons;
        reasons.push(reason);
        Self {
            eligible: false,
            reasons,
        }
    }
}

/// Decide whether `item` is eligible for deletion under `library`'s rules.
///
/// Rule order:
/// 1. the library must hold a record for the item ("unmanaged" otherwise);
/// 2. the record must be fully imported;
/// 3. the item must have seeded at least `min_seed_days` since completion;
/// 4. the item's category must match the library's, when one is configured.
pub fn evaluate(item: &Item, library: &LibraryConfig, now: Timestamp) -> EligibilityResult {
    let mut reasons = Vec::new();

    let Some(link) = item.link(&library.name) else {
        return EligibilityResult::excluded(reasons, "unmanaged".into());
    };
    reasons.push(format!("managed by {}", library.name));

    if !link.imported {
        return EligibilityResult::excluded(
            reasons,
            format!("import pending in {}", library.name),
        );
    }
    reasons.push(format!("imported by {}", library.name));

    let Some(seeded) = item.seed_days(now) else {
        return EligibilityResult::excluded(reasons, "no completion time recorded".into());
    };
    let minimum = f64::from(library.min_seed_days);
    if seeded < minimum {
        return EligibilityResult::excluded(
            reasons,
            format!(
                "seeded {seeded:.1} of {minimum:.0} days ({:.1} remaining)",
                minimum - seeded
            ),
        );
    }
    reasons.push(format!("seeded {seeded:.1} days (minimum {minimum:.0})"));

    if let Some(category) = &library.category {
        if item.category.as_deref() != Some(category.as_str()) {
            return EligibilityResult::excluded(
                reasons,
                format!(
                    "category mismatch: expected '{category}', found '{}'",
                    item.category.as_deref().unwrap_or("none")
                ),
            );
        }
        reasons.push(format!("category '{category}' matches"));
    }

    EligibilityResult {
        eligible: true,
        reasons,
    }
}
