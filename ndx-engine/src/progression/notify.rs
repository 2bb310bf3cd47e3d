//! User-facing notification text
//!
//! Maps discriminated progression events to display strings. Keeping the
//! mapping here leaves the tracker and evaluator free of any rendering
//! concern, so the state machine is testable without a display surface.

use ndx_common::DiscoveryCategory;
use std::fmt;

/// The single notification produced by one submit action
///
/// `AchievementUnlocked` supersedes `Collected` when both would apply to
/// the same call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A new item was collected
    Collected {
        category: DiscoveryCategory,
        label: String,
        new_count: u8,
    },

    /// The category row was already full
    CategoryFull { category: DiscoveryCategory },

    /// The category reached the ceiling for the first time
    AchievementUnlocked { category: DiscoveryCategory },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Collected { label, .. } => {
                write!(f, "You collected a new item: {}", label)
            }
            Notification::CategoryFull { category } => {
                write!(f, "Already maxed {}!", category.as_str())
            }
            Notification::AchievementUnlocked { category } => {
                write!(
                    f,
                    "{} Achievement Unlocked!",
                    category.singular().to_uppercase()
                )
            }
        }
    }
}
