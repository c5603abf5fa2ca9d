//! Engine tuning knobs.

use crate::pity::PityRules;
use crate::ports::Cost;
use crate::synthesis::SynthesisOdds;

/// Configuration for an [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Pity floors and reset grade.
    pub pity: PityRules,
    /// Mutation and great-success curves.
    pub odds: SynthesisOdds,
    /// Largest number of eggs a single hatch request may open.
    pub max_batch: u32,
    /// Credited the first time a player discovers a species.
    pub first_discovery_reward: Cost,
    /// Experience granted to the new creature on a great success.
    pub great_success_experience: u32,
    /// Affection granted to the new creature on a great success.
    pub great_success_affection: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pity: PityRules::default(),
            odds: SynthesisOdds::default(),
            max_batch: 10,
            first_discovery_reward: Cost::stardust(50),
            great_success_experience: 300,
            great_success_affection: 20,
        }
    }
}

impl EngineConfig {
    /// Replace the pity rules.
    pub fn with_pity(mut self, pity: PityRules) -> Self {
        self.pity = pity;
        self
    }

    /// Replace the synthesis odds.
    pub fn with_odds(mut self, odds: SynthesisOdds) -> Self {
        self.odds = odds;
        self
    }

    /// Set the batch limit (at least 1).
    pub fn with_max_batch(mut self, max_batch: u32) -> Self {
        self.max_batch = max_batch.max(1);
        self
    }

    /// Set the first-discovery reward.
    pub fn with_first_discovery_reward(mut self, reward: Cost) -> Self {
        self.first_discovery_reward = reward;
        self
    }

    /// Set the great-success experience and affection bonus.
    pub fn with_great_success_bonus(mut self, experience: u32, affection: u8) -> Self {
        self.great_success_experience = experience;
        self.great_success_affection = affection.min(100);
        self
    }
}
