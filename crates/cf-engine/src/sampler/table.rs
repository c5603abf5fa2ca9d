//! Cumulative grade weight tables.
//!
//! A table lists one weight per grade in ascending rarity order. Sampling
//! draws a uniform value in `[0, 100)` and walks the cumulative boundaries
//! with strict `<`: the first boundary strictly above the draw wins, so a
//! draw sitting exactly on a boundary falls into the next, rarer bucket.

use rand::Rng;
use serde::{Deserialize, Serialize};

use cf_core::Grade;

use crate::error::{EngineError, EngineResult};

/// Sum every table must reach.
pub const TABLE_TOTAL: f64 = 100.0;

const TOTAL_TOLERANCE: f64 = 1e-9;

/// Weights over [`Grade::ALL`], summing to [`TABLE_TOTAL`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeTable {
    weights: [f64; 6],
}

impl GradeTable {
    /// Standard egg odds.
    pub const NORMAL: GradeTable = GradeTable {
        weights: [45.0, 30.0, 15.0, 7.0, 2.5, 0.5],
    };

    /// Odds while a luck buff is active.
    pub const LUCKY: GradeTable = GradeTable {
        weights: [25.0, 30.0, 25.0, 12.0, 6.0, 2.0],
    };

    /// Premium egg odds; never common.
    pub const PREMIUM: GradeTable = GradeTable {
        weights: [0.0, 35.0, 35.0, 20.0, 8.0, 2.0],
    };

    /// Legendary egg odds.
    pub const LEGENDARY: GradeTable = GradeTable {
        weights: [0.0, 0.0, 0.0, 0.0, 90.0, 10.0],
    };

    /// Build a table, rejecting negative, non-finite, or mis-totalled weights.
    pub fn new(weights: [f64; 6]) -> EngineResult<Self> {
        for (grade, w) in Grade::ALL.iter().zip(weights) {
            if !w.is_finite() || w < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "weight for {grade} must be a non-negative number, got {w}"
                )));
            }
        }
        let total: f64 = weights.iter().sum();
        if (total - TABLE_TOTAL).abs() > TOTAL_TOLERANCE {
            return Err(EngineError::InvalidConfig(format!(
                "grade weights must total {TABLE_TOTAL}, got {total}"
            )));
        }
        Ok(Self { weights })
    }

    /// A table that always yields `grade`.
    pub fn only(grade: Grade) -> Self {
        let mut weights = [0.0; 6];
        weights[grade.index()] = TABLE_TOTAL;
        Self { weights }
    }

    /// Weight assigned to `grade`.
    pub fn weight(&self, grade: Grade) -> f64 {
        self.weights[grade.index()]
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Cumulative upper boundary of each grade's bucket.
    pub fn boundaries(&self) -> [(Grade, f64); 6] {
        let mut acc = 0.0;
        Grade::ALL.map(|g| {
            acc += self.weight(g);
            (g, acc)
        })
    }

    /// Map a draw in `[0, total)` to its grade.
    pub fn grade_for_roll(&self, roll: f64) -> Grade {
        for (grade, boundary) in self.boundaries() {
            if roll < boundary {
                return grade;
            }
        }
        // Only reachable through float drift at the very top; land on the
        // rarest grade that can actually drop.
        Grade::ALL
            .into_iter()
            .rev()
            .find(|g| self.weight(*g) > 0.0)
            .unwrap_or(Grade::Common)
    }

    /// Draw a grade.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Grade {
        let roll = rng.random_range(0.0..TABLE_TOTAL);
        self.grade_for_roll(roll)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const BUILTIN: [GradeTable; 4] = [
        GradeTable::NORMAL,
        GradeTable::LUCKY,
        GradeTable::PREMIUM,
        GradeTable::LEGENDARY,
    ];

    #[test]
    fn builtin_tables_total_one_hundred() {
        for table in BUILTIN {
            assert!((table.total() - TABLE_TOTAL).abs() < TOTAL_TOLERANCE);
            assert!(GradeTable::new(table.weights).is_ok());
        }
    }

    #[test]
    fn boundary_draw_lands_in_rarer_bucket() {
        let t = GradeTable::NORMAL;
        assert_eq!(t.grade_for_roll(0.0), Grade::Common);
        assert_eq!(t.grade_for_roll(44.999), Grade::Common);
        assert_eq!(t.grade_for_roll(45.0), Grade::Uncommon);
        assert_eq!(t.grade_for_roll(75.0), Grade::Rare);
        assert_eq!(t.grade_for_roll(90.0), Grade::Epic);
        assert_eq!(t.grade_for_roll(97.0), Grade::Legendary);
        assert_eq!(t.grade_for_roll(99.5), Grade::Mythic);
        assert_eq!(t.grade_for_roll(99.999), Grade::Mythic);
    }

    #[test]
    fn zero_weight_buckets_never_selected() {
        let t = GradeTable::PREMIUM;
        assert_eq!(t.grade_for_roll(0.0), Grade::Uncommon);
        let t = GradeTable::LEGENDARY;
        assert_eq!(t.grade_for_roll(0.0), Grade::Legendary);
        assert_eq!(t.grade_for_roll(90.0), Grade::Mythic);
    }

    #[test]
    fn drift_past_total_falls_back_to_rarest_droppable() {
        assert_eq!(GradeTable::NORMAL.grade_for_roll(100.0), Grade::Mythic);
        assert_eq!(GradeTable::only(Grade::Rare).grade_for_roll(100.0), Grade::Rare);
    }

    #[test]
    fn invalid_tables_rejected() {
        assert!(GradeTable::new([50.0, 30.0, 10.0, 5.0, 2.5, 0.5]).is_err());
        assert!(GradeTable::new([-5.0, 50.0, 30.0, 15.0, 7.0, 3.0]).is_err());
        assert!(GradeTable::new([f64::NAN, 30.0, 15.0, 7.0, 2.5, 0.5]).is_err());
    }

    #[test]
    fn hundred_thousand_draws_match_weights() {
        let mut rng = StdRng::seed_from_u64(2024);
        for table in [GradeTable::NORMAL, GradeTable::LUCKY] {
            let draws = 100_000;
            let mut counts: HashMap<Grade, u32> = HashMap::new();
            for _ in 0..draws {
                *counts.entry(table.sample(&mut rng)).or_default() += 1;
            }
            for grade in Grade::ALL {
                let observed = f64::from(counts.get(&grade).copied().unwrap_or(0)) * 100.0
                    / f64::from(draws);
                let expected = table.weight(grade);
                assert!(
                    (observed - expected).abs() < 0.6,
                    "{grade}: observed {observed:.3}% vs expected {expected}%"
                );
            }
        }
    }

    #[test]
    fn only_table_is_degenerate() {
        let mut rng = StdRng::seed_from_u64(1);
        let t = GradeTable::only(Grade::Common);
        assert!((0..1_000).all(|_| t.sample(&mut rng) == Grade::Common));
    }
}
