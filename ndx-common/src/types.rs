//! Discovery taxonomy and usage quota types
//!
//! The taxonomy is a closed set: every discovery belongs to exactly one of
//! three categories, and raw classifier output must be mapped through the
//! fixed synonym table before it may be persisted or counted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum collected items per category (fills the badge row)
pub const MAX_PER_TYPE: u8 = 5;

/// Total classification requests available per user
pub const TOTAL_REQUESTS_AVAILABLE: u32 = 20;

/// Closed discovery taxonomy
///
/// Serialized in the wire (plural) form used by the backend API:
/// `"flowers"` | `"trees"` | `"rocks"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryCategory {
    Flowers,
    Trees,
    Rocks,
}

impl DiscoveryCategory {
    /// All categories, in display order
    pub const ALL: [DiscoveryCategory; 3] = [
        DiscoveryCategory::Flowers,
        DiscoveryCategory::Trees,
        DiscoveryCategory::Rocks,
    ];

    /// Map a raw classifier category through the fixed synonym table.
    ///
    /// Returns `None` for any value outside the table. Unmapped results are
    /// never persisted or counted (the description may still be displayed).
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "flower" => Some(DiscoveryCategory::Flowers),
            "tree" => Some(DiscoveryCategory::Trees),
            "rock" => Some(DiscoveryCategory::Rocks),
            _ => None,
        }
    }

    /// Wire name used by the backend API
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryCategory::Flowers => "flowers",
            DiscoveryCategory::Trees => "trees",
            DiscoveryCategory::Rocks => "rocks",
        }
    }

    /// Singular display name
    pub fn singular(&self) -> &'static str {
        match self {
            DiscoveryCategory::Flowers => "flower",
            DiscoveryCategory::Trees => "tree",
            DiscoveryCategory::Rocks => "rock",
        }
    }

    /// Achievement badge title for this category
    pub fn badge_title(&self) -> &'static str {
        match self {
            DiscoveryCategory::Flowers => "Flower Master",
            DiscoveryCategory::Trees => "Tree Guardian",
            DiscoveryCategory::Rocks => "Rock Collector",
        }
    }
}

impl fmt::Display for DiscoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-user usage quota record
///
/// The external store owns the authoritative count; this is the client-side
/// readback. Remaining allowance is clamped at zero: `used` above the
/// allowance is a server-side anomaly, not a valid local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Classification requests consumed so far
    pub used: u32,
}

impl UsageRecord {
    pub fn new(used: u32) -> Self {
        Self { used }
    }

    /// Remaining allowance, clamped at zero
    pub fn remaining(&self) -> u32 {
        TOTAL_REQUESTS_AVAILABLE.saturating_sub(self.used)
    }

    /// True once the full allowance has been consumed
    pub fn exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonym_table_maps_known_categories() {
        assert_eq!(
            DiscoveryCategory::from_raw("flower"),
            Some(DiscoveryCategory::Flowers)
        );
        assert_eq!(
            DiscoveryCategory::from_raw("tree"),
            Some(DiscoveryCategory::Trees)
        );
        assert_eq!(
            DiscoveryCategory::from_raw("rock"),
            Some(DiscoveryCategory::Rocks)
        );
    }

    #[test]
    fn test_unmapped_categories_rejected() {
        assert_eq!(DiscoveryCategory::from_raw("mineral"), None);
        assert_eq!(DiscoveryCategory::from_raw(""), None);
        // The table maps singular classifier output only; wire names are
        // not synonyms of themselves.
        assert_eq!(DiscoveryCategory::from_raw("flowers"), None);
        assert_eq!(DiscoveryCategory::from_raw("Flower"), None);
    }

    #[test]
    fn test_wire_names_are_plural() {
        assert_eq!(DiscoveryCategory::Flowers.as_str(), "flowers");
        assert_eq!(DiscoveryCategory::Trees.as_str(), "trees");
        assert_eq!(DiscoveryCategory::Rocks.as_str(), "rocks");
    }

    #[test]
    fn test_category_serializes_to_wire_name() {
        let json = serde_json::to_string(&DiscoveryCategory::Rocks).unwrap();
        assert_eq!(json, "\"rocks\"");

        let parsed: DiscoveryCategory = serde_json::from_str("\"trees\"").unwrap();
        assert_eq!(parsed, DiscoveryCategory::Trees);
    }

    #[test]
    fn test_usage_remaining_clamped_at_zero() {
        assert_eq!(UsageRecord::new(0).remaining(), TOTAL_REQUESTS_AVAILABLE);
        assert_eq!(UsageRecord::new(19).remaining(), 1);
        assert_eq!(UsageRecord::new(20).remaining(), 0);
        // Over-consumption reported by the store must not go negative
        assert_eq!(UsageRecord::new(25).remaining(), 0);
    }

    #[test]
    fn test_usage_exhaustion_boundary() {
        assert!(!UsageRecord::new(19).exhausted());
        assert!(UsageRecord::new(20).exhausted());
        assert!(UsageRecord::new(21).exhausted());
    }
}
