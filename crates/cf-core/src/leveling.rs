//! Experience and level progression.
//!
//! Shared by synthesis (great-success bonus), nurture and training. Pure
//! functions only; callers persist the result.

/// Highest reachable level.
pub const MAX_LEVEL: u32 = 30;

/// Experience needed to advance from `level` to `level + 1`.
pub fn experience_to_next(level: u32) -> u32 {
    level.saturating_mul(100)
}

/// Outcome of [`apply_experience`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    /// Level after applying the gain.
    pub level: u32,
    /// Leftover experience toward the next level.
    pub experience: u32,
    /// Whether at least one level was gained.
    pub leveled_up: bool,
}

/// Add `gained` experience and roll over as many levels as it pays for.
///
/// Stops at [`MAX_LEVEL`]; experience left over at the cap is discarded.
pub fn apply_experience(level: u32, experience: u32, gained: u32) -> LevelProgress {
    let start = level.max(1);
    let mut level = start;
    let mut exp = experience.saturating_add(gained);

    while level < MAX_LEVEL && exp >= experience_to_next(level) {
        exp -= experience_to_next(level);
        level += 1;
    }
    if level >= MAX_LEVEL {
        exp = 0;
    }

    LevelProgress {
        level,
        experience: exp,
        leveled_up: level > start,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn no_level_below_requirement() {
        let p = apply_experience(1, 0, 99);
        assert_eq!(
            p,
            LevelProgress {
                level: 1,
                experience: 99,
                leveled_up: false
            }
        );
    }

    #[test]
    fn exact_requirement_levels_up() {
        let p = apply_experience(1, 0, 100);
        assert_eq!(p.level, 2);
        assert_eq!(p.experience, 0);
        assert!(p.leveled_up);
    }

    #[test]
    fn multiple_levels_in_one_gain() {
        // 100 (1->2) + 200 (2->3) + 300 (3->4) = 600, 50 left over
        let p = apply_experience(1, 0, 650);
        assert_eq!(p.level, 4);
        assert_eq!(p.experience, 50);
    }

    #[test]
    fn existing_experience_counts() {
        let p = apply_experience(3, 250, 60);
        assert_eq!(p.level, 4);
        assert_eq!(p.experience, 10);
    }

    #[test]
    fn cap_discards_residual() {
        let p = apply_experience(29, 0, 10_000);
        assert_eq!(p.level, MAX_LEVEL);
        assert_eq!(p.experience, 0);
        assert!(p.leveled_up);

        let at_cap = apply_experience(MAX_LEVEL, 0, 500);
        assert_eq!(at_cap.level, MAX_LEVEL);
        assert_eq!(at_cap.experience, 0);
        assert!(!at_cap.leveled_up);
    }

    proptest! {
        #[test]
        fn level_never_decreases_or_exceeds_cap(
            level in 1u32..=MAX_LEVEL,
            exp in 0u32..5_000,
            gained in 0u32..200_000,
        ) {
            let p = apply_experience(level, exp, gained);
            prop_assert!(p.level >= level);
            prop_assert!(p.level <= MAX_LEVEL);
            if p.level < MAX_LEVEL {
                prop_assert!(p.experience < experience_to_next(p.level));
            } else {
                prop_assert_eq!(p.experience, 0);
            }
        }
    }
}
