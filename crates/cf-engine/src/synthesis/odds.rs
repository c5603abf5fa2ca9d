//! Mutation and great-success probabilities.
//!
//! Both sub-rolls follow the same gated linear curve over the player's
//! collection score:
//!
//! ```text
//! chance(score) = 0                                              if score < threshold
//!               = min(cap, base + (score - threshold) * per_point) otherwise
//! ```
//!
//! A material's `mutation_bonus` is added on top of the mutation curve once
//! the gate is open; the result is clamped to 0-100. A material that
//! forces a sub-roll bypasses the gate entirely (handled by the caller).

use rand::Rng;
use serde::{Deserialize, Serialize};

use cf_core::MaterialEffect;

/// A gated, capped linear chance curve in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChanceCurve {
    /// Minimum collection score for any chance at all.
    pub threshold: u32,
    /// Chance in percent at exactly `threshold`.
    pub base: f64,
    /// Percentage points added per score point above `threshold`.
    pub per_point: f64,
    /// Upper bound in percent.
    pub cap: f64,
}

impl ChanceCurve {
    /// Chance in percent for `score`.
    pub fn chance(&self, score: u32) -> f64 {
        if score < self.threshold {
            return 0.0;
        }
        let above = f64::from(score - self.threshold);
        (self.base + above * self.per_point).min(self.cap).clamp(0.0, 100.0)
    }

    /// Whether the gate is open for `score`.
    pub fn is_open(&self, score: u32) -> bool {
        score >= self.threshold
    }
}

/// Tunable synthesis odds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisOdds {
    /// Curve for the mutation sub-roll.
    pub mutation: ChanceCurve,
    /// Curve for the great-success sub-roll.
    pub great_success: ChanceCurve,
}

impl Default for SynthesisOdds {
    fn default() -> Self {
        Self {
            mutation: ChanceCurve {
                threshold: 50,
                base: 2.0,
                per_point: 0.05,
                cap: 15.0,
            },
            great_success: ChanceCurve {
                threshold: 20,
                base: 5.0,
                per_point: 0.1,
                cap: 25.0,
            },
        }
    }
}

impl SynthesisOdds {
    /// Mutation chance in percent, including the material bonus.
    pub fn mutation_chance(&self, score: u32, effect: Option<&MaterialEffect>) -> f64 {
        if !self.mutation.is_open(score) {
            return 0.0;
        }
        let bonus = effect.map(|e| e.mutation_bonus).unwrap_or(0.0);
        (self.mutation.chance(score) + bonus).clamp(0.0, 100.0)
    }

    /// Great-success chance in percent.
    pub fn great_success_chance(&self, score: u32) -> f64 {
        self.great_success.chance(score)
    }
}

/// Roll a percent chance. Always consumes exactly one draw.
pub fn roll_percent<R: Rng + ?Sized>(chance: f64, rng: &mut R) -> bool {
    rng.random_range(0.0..100.0) < chance
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn gate_closed_below_threshold() {
        let odds = SynthesisOdds::default();
        assert_eq!(odds.great_success_chance(19), 0.0);
        let bonus = MaterialEffect {
            mutation_bonus: 40.0,
            ..Default::default()
        };
        assert_eq!(odds.mutation_chance(49, Some(&bonus)), 0.0);
    }

    #[test]
    fn chance_grows_then_caps() {
        let odds = SynthesisOdds::default();
        assert!((odds.mutation_chance(50, None) - 2.0).abs() < 1e-9);
        assert!((odds.mutation_chance(150, None) - 7.0).abs() < 1e-9);
        assert!((odds.mutation_chance(10_000, None) - 15.0).abs() < 1e-9);
        assert!((odds.great_success_chance(20) - 5.0).abs() < 1e-9);
        assert!((odds.great_success_chance(5_000) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn material_bonus_stacks_and_clamps() {
        let odds = SynthesisOdds::default();
        let small = MaterialEffect {
            mutation_bonus: 10.0,
            ..Default::default()
        };
        assert!((odds.mutation_chance(50, Some(&small)) - 12.0).abs() < 1e-9);
        let huge = MaterialEffect {
            mutation_bonus: 100.0,
            ..Default::default()
        };
        assert!((odds.mutation_chance(10_000, Some(&huge)) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn roll_extremes() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!((0..500).all(|_| !roll_percent(0.0, &mut rng)));
        assert!((0..500).all(|_| roll_percent(100.0, &mut rng)));
    }
}
