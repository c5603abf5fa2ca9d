//! Collaborator interfaces the engine consumes.
//!
//! The engine never touches balances, creature rows, codex entries or pity
//! counters directly; every effect goes through one of these traits. All
//! methods take `&self` so a single store can serve concurrent requests,
//! and every implementation must make its guarded operations atomic.

use std::fmt;

use serde::{Deserialize, Serialize};

use cf_core::{Creature, CreatureId, MaterialId, NewCreature, PlayerId, SpeciesId};

use crate::analytics::AnalyticsEvent;
use crate::error::StoreResult;

/// An amount of in-game currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    /// Soft currency.
    #[serde(default)]
    pub gold: u64,
    /// Premium currency.
    #[serde(default)]
    pub gems: u64,
    /// Crafting currency.
    #[serde(default)]
    pub stardust: u64,
}

impl Cost {
    /// Gold only.
    pub fn gold(gold: u64) -> Self {
        Self {
            gold,
            ..Self::default()
        }
    }

    /// Gems only.
    pub fn gems(gems: u64) -> Self {
        Self {
            gems,
            ..Self::default()
        }
    }

    /// Stardust only.
    pub fn stardust(stardust: u64) -> Self {
        Self {
            stardust,
            ..Self::default()
        }
    }

    /// This cost `n` times over, saturating.
    pub fn times(self, n: u32) -> Self {
        let n = u64::from(n);
        Self {
            gold: self.gold.saturating_mul(n),
            gems: self.gems.saturating_mul(n),
            stardust: self.stardust.saturating_mul(n),
        }
    }

    /// Whether nothing is charged.
    pub fn is_zero(&self) -> bool {
        self.gold == 0 && self.gems == 0 && self.stardust == 0
    }

    /// Whether `self` covers `other` in every currency.
    pub fn covers(&self, other: &Cost) -> bool {
        self.gold >= other.gold && self.gems >= other.gems && self.stardust >= other.stardust
    }

    /// Component-wise saturating sum.
    pub fn saturating_add(self, other: Cost) -> Self {
        Self {
            gold: self.gold.saturating_add(other.gold),
            gems: self.gems.saturating_add(other.gems),
            stardust: self.stardust.saturating_add(other.stardust),
        }
    }

    /// Component-wise saturating difference.
    pub fn saturating_sub(self, other: Cost) -> Self {
        Self {
            gold: self.gold.saturating_sub(other.gold),
            gems: self.gems.saturating_sub(other.gems),
            stardust: self.stardust.saturating_sub(other.stardust),
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.gold > 0 {
            parts.push(format!("{} gold", self.gold));
        }
        if self.gems > 0 {
            parts.push(format!("{} gems", self.gems));
        }
        if self.stardust > 0 {
            parts.push(format!("{} stardust", self.stardust));
        }
        if parts.is_empty() {
            write!(f, "free")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Currency and material balances.
pub trait Ledger: Send + Sync {
    /// Debit `cost` only if the balance covers it.
    ///
    /// Returns `Ok(false)` and changes nothing when the balance is short.
    fn spend_currency(&self, player: PlayerId, cost: Cost) -> StoreResult<bool>;

    /// Credit `amount`.
    fn add_currency(&self, player: PlayerId, amount: Cost) -> StoreResult<()>;

    /// Remove `quantity` units only if the player holds that many.
    ///
    /// Returns `Ok(false)` and changes nothing otherwise.
    fn consume_material(
        &self,
        player: PlayerId,
        material: MaterialId,
        quantity: u32,
    ) -> StoreResult<bool>;

    /// Give back `quantity` units.
    fn add_material(&self, player: PlayerId, material: MaterialId, quantity: u32)
    -> StoreResult<()>;
}

/// Creature persistence.
pub trait CreatureRepository: Send + Sync {
    /// Persist a new creature.
    fn create(&self, creature: NewCreature) -> StoreResult<Creature>;

    /// Remove a creature.
    fn delete(&self, id: CreatureId) -> StoreResult<()>;

    /// Look up a creature.
    fn find(&self, id: CreatureId) -> StoreResult<Option<Creature>>;

    /// Number of creatures a player owns.
    fn count_by_owner(&self, player: PlayerId) -> StoreResult<usize>;

    /// Create `creature` and delete `consumed` as one unit.
    ///
    /// The default creates first and deletes afterwards. If the very first
    /// delete fails, the new record is removed again and the error returned.
    /// Once any input is gone the new creature is kept and the surviving
    /// inputs are logged for cleanup. Stores with real transactions should
    /// override it.
    fn replace(&self, consumed: &[CreatureId], creature: NewCreature) -> StoreResult<Creature> {
        let created = self.create(creature)?;
        for (index, id) in consumed.iter().enumerate() {
            if let Err(err) = self.delete(*id) {
                if index == 0 {
                    self.delete(created.id)?;
                    return Err(err);
                }
                tracing::error!(
                    created = %created.id,
                    surviving = ?&consumed[index..],
                    error = %err,
                    "synthesis inputs survived a partial replace; manual cleanup required"
                );
                break;
            }
        }
        Ok(created)
    }
}

/// Discovery codex.
pub trait CodexStore: Send + Sync {
    /// Record that the player has seen `species`.
    fn add_discovery_entry(&self, player: PlayerId, species: SpeciesId) -> StoreResult<()>;

    /// Current collection score.
    fn collection_score(&self, player: PlayerId) -> StoreResult<u32>;

    /// Claim the first-discovery reward for `species`.
    ///
    /// Returns `true` exactly once per (player, species).
    fn try_register_first_discovery(&self, player: PlayerId, species: SpeciesId)
    -> StoreResult<bool>;
}

/// Long-running activities that lock a creature (exploration, training).
pub trait ActivityLock: Send + Sync {
    /// Whether any of `creatures` is currently engaged.
    fn is_creature_busy(&self, player: PlayerId, creatures: &[CreatureId]) -> StoreResult<bool>;
}

/// Time-boxed player buffs.
pub trait BuffStore: Send + Sync {
    /// Whether the luck buff is active right now.
    fn is_luck_active(&self, player: PlayerId) -> StoreResult<bool>;
}

/// Durable pity counters.
pub trait PityStore: Send + Sync {
    /// Atomically add one draw and return the new count.
    fn increment(&self, player: PlayerId, pool: &str) -> StoreResult<u32>;

    /// Set the counter back to zero.
    fn reset(&self, player: PlayerId, pool: &str) -> StoreResult<()>;

    /// Take back one increment, never going below zero.
    ///
    /// Used when a draw fails after its increment was recorded.
    fn decrement(&self, player: PlayerId, pool: &str) -> StoreResult<()>;

    /// Current count without changing it.
    fn count(&self, player: PlayerId, pool: &str) -> StoreResult<u32>;
}

/// Mission counters the engine advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mission {
    /// Eggs hatched.
    Hatch,
    /// Successful syntheses.
    Synthesis,
    /// New species discovered.
    Discovery,
}

/// Mission progress.
pub trait MissionTracker: Send + Sync {
    /// Add `amount` to a mission counter.
    fn record(&self, player: PlayerId, mission: Mission, amount: u32) -> StoreResult<()>;
}

/// Structured analytics.
///
/// Best-effort by contract: `record` must not block on I/O and must not
/// fail the caller. Implementations drop events they cannot accept.
pub trait AnalyticsSink: Send + Sync {
    /// Hand an event to the sink.
    fn record(&self, event: AnalyticsEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_arithmetic() {
        let egg = Cost::gold(100);
        assert_eq!(egg.times(10), Cost::gold(1_000));
        assert!(Cost::gold(1_000).covers(&egg.times(10)));
        assert!(!Cost::gold(999).covers(&egg.times(10)));
        assert_eq!(
            Cost::gold(150).saturating_sub(Cost::gold(200)),
            Cost::default()
        );
        assert!(Cost::default().is_zero());
    }

    #[test]
    fn cost_display() {
        assert_eq!(Cost::default().to_string(), "free");
        let mixed = Cost::gold(5).saturating_add(Cost::gems(2));
        assert_eq!(mixed.to_string(), "5 gold, 2 gems");
    }
}
