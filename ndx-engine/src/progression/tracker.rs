//! Collection progression tracker
//!
//! Holds the active session's collection state: one bounded counter per
//! category plus the achievement latch. The backend store owns the
//! authoritative state; this cache is reconciled from it on load and is
//! stale thereafter until the next read.
//!
//! Invariants:
//! - `0 <= count <= MAX_PER_TYPE` for every category, always
//! - an unlocked achievement never relocks, even if a later snapshot
//!   reports a lower count (display-only readback, not a revocation)

use crate::types::CollectionSnapshot;
use ndx_common::{DiscoveryCategory, MAX_PER_TYPE};
use std::collections::HashMap;

/// Outcome of one collect attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvent {
    /// Count advanced by exactly one
    Collected {
        category: DiscoveryCategory,
        previous_count: u8,
        new_count: u8,
    },

    /// Count already at the ceiling; state unchanged
    ///
    /// An expected boundary condition with its own user-facing message,
    /// not an error.
    CategoryFull { category: DiscoveryCategory },
}

#[derive(Debug, Clone, Copy, Default)]
struct CategoryProgress {
    count: u8,
    unlocked: bool,
}

/// Per-session collection state
///
/// Owned by the orchestrator and passed explicitly; no ambient globals.
#[derive(Debug, Clone, Default)]
pub struct ProgressionState {
    entries: HashMap<DiscoveryCategory, CategoryProgress>,
}

impl ProgressionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count for one category
    pub fn count(&self, category: DiscoveryCategory) -> u8 {
        self.entries.get(&category).map(|e| e.count).unwrap_or(0)
    }

    /// Achievement latch state for one category
    pub fn unlocked(&self, category: DiscoveryCategory) -> bool {
        self.entries
            .get(&category)
            .map(|e| e.unlocked)
            .unwrap_or(false)
    }

    /// Attempt to collect one item, clamped at the ceiling
    pub fn collect(&mut self, category: DiscoveryCategory) -> CollectionEvent {
        let entry = self.entries.entry(category).or_default();

        if entry.count >= MAX_PER_TYPE {
            return CollectionEvent::CategoryFull { category };
        }

        let previous_count = entry.count;
        entry.count += 1;

        CollectionEvent::Collected {
            category,
            previous_count,
            new_count: entry.count,
        }
    }

    /// Latch the achievement for a category
    ///
    /// Monotonic: latching an already-unlocked category is a no-op.
    pub fn latch_unlock(&mut self, category: DiscoveryCategory) {
        self.entries.entry(category).or_default().unlocked = true;
    }

    /// Reconcile from an authoritative store snapshot
    ///
    /// Counts are replaced (clamped into range); achievements merge with
    /// a logical OR so a latched unlock survives a stale readback.
    pub fn apply_snapshot(&mut self, snapshot: &CollectionSnapshot) {
        for category in DiscoveryCategory::ALL {
            let entry = self.entries.entry(category).or_default();
            entry.count = snapshot.count(category);
            entry.unlocked = entry.unlocked || snapshot.unlocked(category);
        }
    }
}
