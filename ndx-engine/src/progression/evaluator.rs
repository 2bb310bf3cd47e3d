//! Achievement unlock evaluation
//!
//! Pure transition function, the sole path that ever flips an achievement
//! from locked to unlocked. One-shot monotonic latch per category: once
//! unlocked, repeated calls at the ceiling return `None`.

use ndx_common::{DiscoveryCategory, MAX_PER_TYPE};

/// Unlock transition produced when a category first reaches the ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockTransition {
    pub category: DiscoveryCategory,
}

/// Evaluate whether a count transition unlocks the achievement
///
/// Returns `Some` iff the count crossed into the ceiling on this transition
/// and the achievement is not already unlocked.
pub fn evaluate(
    category: DiscoveryCategory,
    previous_count: u8,
    new_count: u8,
    already_unlocked: bool,
) -> Option<UnlockTransition> {
    if new_count == MAX_PER_TYPE && previous_count < MAX_PER_TYPE && !already_unlocked {
        Some(UnlockTransition { category })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_fires_on_crossing_the_ceiling() {
        let transition = evaluate(DiscoveryCategory::Flowers, 4, 5, false);
        assert_eq!(
            transition,
            Some(UnlockTransition {
                category: DiscoveryCategory::Flowers
            })
        );
    }

    #[test]
    fn test_no_unlock_below_ceiling() {
        assert_eq!(evaluate(DiscoveryCategory::Trees, 2, 3, false), None);
        assert_eq!(evaluate(DiscoveryCategory::Trees, 0, 1, false), None);
    }

    #[test]
    fn test_no_unlock_when_already_unlocked() {
        assert_eq!(evaluate(DiscoveryCategory::Rocks, 4, 5, true), None);
    }

    #[test]
    fn test_no_unlock_when_count_stays_at_ceiling() {
        // A clamped collect at the ceiling reports previous == new == MAX
        assert_eq!(evaluate(DiscoveryCategory::Rocks, 5, 5, true), None);
        assert_eq!(evaluate(DiscoveryCategory::Rocks, 5, 5, false), None);
    }

    #[test]
    fn test_unlock_fires_exactly_once_across_a_count_sequence() {
        let mut unlocked = false;
        let mut transitions = 0;

        // Counts climbing to the ceiling and then stuck there
        let sequence = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 5), (5, 5)];
        for (previous, new) in sequence {
            if let Some(_t) = evaluate(DiscoveryCategory::Flowers, previous, new, unlocked) {
                unlocked = true;
                transitions += 1;
            }
        }

        assert_eq!(transitions, 1);
        assert!(unlocked);
    }
}
