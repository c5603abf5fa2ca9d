//! Pity: guaranteed minimum grades after long unlucky streaks.
//!
//! A counter per (player, pool) counts draws since the last draw that
//! landed at or above the reset grade. Floors are checked from the highest
//! grade down and the first one reached wins, so a counter at 120 forces
//! `legendary`, not `rare`.

use serde::{Deserialize, Serialize};

use cf_core::Grade;

/// One forced-minimum rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityFloor {
    /// Minimum grade enforced once the counter reaches `threshold`.
    pub grade: Grade,
    /// Draw count (inclusive) at which the floor applies.
    pub threshold: u32,
}

/// Pity configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityRules {
    floors: Vec<PityFloor>,
    reset_at: Grade,
}

impl Default for PityRules {
    fn default() -> Self {
        Self::new(
            vec![
                PityFloor {
                    grade: Grade::Rare,
                    threshold: 15,
                },
                PityFloor {
                    grade: Grade::Epic,
                    threshold: 50,
                },
                PityFloor {
                    grade: Grade::Legendary,
                    threshold: 120,
                },
            ],
            Grade::Rare,
        )
    }
}

impl PityRules {
    /// Build rules from floors in any order.
    pub fn new(mut floors: Vec<PityFloor>, reset_at: Grade) -> Self {
        floors.sort_by(|a, b| b.grade.cmp(&a.grade));
        Self { floors, reset_at }
    }

    /// Floors, highest grade first.
    pub fn floors(&self) -> &[PityFloor] {
        &self.floors
    }

    /// Lowest grade that resets the counter.
    pub fn reset_at(&self) -> Grade {
        self.reset_at
    }

    /// The grade a draw at `count` must reach, if any.
    pub fn forced_minimum_grade(&self, count: u32) -> Option<Grade> {
        self.floors
            .iter()
            .find(|floor| count >= floor.threshold)
            .map(|floor| floor.grade)
    }

    /// Whether a draw that ended at `grade` resets the counter.
    pub fn qualifies_for_reset(&self, grade: Grade) -> bool {
        grade >= self.reset_at
    }

    /// Combine a natural draw with the floor for `count`.
    pub fn apply(&self, natural: Grade, count: u32) -> PityDecision {
        match self.forced_minimum_grade(count) {
            Some(floor) if floor > natural => PityDecision {
                grade: floor,
                forced: true,
            },
            _ => PityDecision {
                grade: natural,
                forced: false,
            },
        }
    }
}

/// Grade a draw should be resolved at after pity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PityDecision {
    /// Target grade.
    pub grade: Grade,
    /// Whether pity raised the natural grade.
    pub forced: bool,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn thresholds_checked_highest_first() {
        let rules = PityRules::default();
        assert_eq!(rules.forced_minimum_grade(0), None);
        assert_eq!(rules.forced_minimum_grade(14), None);
        assert_eq!(rules.forced_minimum_grade(15), Some(Grade::Rare));
        assert_eq!(rules.forced_minimum_grade(49), Some(Grade::Rare));
        assert_eq!(rules.forced_minimum_grade(50), Some(Grade::Epic));
        assert_eq!(rules.forced_minimum_grade(119), Some(Grade::Epic));
        assert_eq!(rules.forced_minimum_grade(120), Some(Grade::Legendary));
        assert_eq!(rules.forced_minimum_grade(500), Some(Grade::Legendary));
    }

    #[test]
    fn floors_sorted_regardless_of_input_order() {
        let rules = PityRules::default();
        let grades: Vec<Grade> = rules.floors().iter().map(|f| f.grade).collect();
        assert_eq!(grades, vec![Grade::Legendary, Grade::Epic, Grade::Rare]);
    }

    #[test]
    fn natural_grade_above_floor_is_kept() {
        let rules = PityRules::default();
        let d = rules.apply(Grade::Epic, 15);
        assert_eq!(d.grade, Grade::Epic);
        assert!(!d.forced);
    }

    #[test]
    fn natural_grade_below_floor_is_raised() {
        let rules = PityRules::default();
        let d = rules.apply(Grade::Common, 15);
        assert_eq!(d.grade, Grade::Rare);
        assert!(d.forced);
    }

    #[test]
    fn reset_from_rare_up() {
        let rules = PityRules::default();
        assert!(!rules.qualifies_for_reset(Grade::Uncommon));
        assert!(rules.qualifies_for_reset(Grade::Rare));
        assert!(rules.qualifies_for_reset(Grade::Mythic));
    }

    proptest! {
        #[test]
        fn decision_never_below_natural_or_floor(
            natural_idx in 0usize..6,
            count in 0u32..300,
        ) {
            let rules = PityRules::default();
            let natural = Grade::ALL[natural_idx];
            let d = rules.apply(natural, count);
            prop_assert!(d.grade >= natural);
            if let Some(floor) = rules.forced_minimum_grade(count) {
                prop_assert!(d.grade >= floor);
            }
            prop_assert_eq!(d.forced, d.grade != natural);
        }
    }
}
