use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::SpeciesId;
use crate::grade::Element;

/// Identifier of a player account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Generate a new random player ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Identifier of an owned creature instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatureId(pub Uuid);

impl CreatureId {
    /// Generate a new random creature ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CreatureId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Temperament assigned at creation, uniformly at random.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    /// Bold in exploration.
    Brave,
    /// Shy around strangers.
    Timid,
    /// Always upbeat.
    Cheerful,
    /// Naps a lot.
    Lazy,
    /// Pokes at everything.
    Curious,
    /// Calm and kind.
    Gentle,
}

impl Personality {
    /// All personalities.
    pub const ALL: [Personality; 6] = [
        Personality::Brave,
        Personality::Timid,
        Personality::Cheerful,
        Personality::Lazy,
        Personality::Curious,
        Personality::Gentle,
    ];

    /// Pick a personality uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brave => write!(f, "brave"),
            Self::Timid => write!(f, "timid"),
            Self::Cheerful => write!(f, "cheerful"),
            Self::Lazy => write!(f, "lazy"),
            Self::Curious => write!(f, "curious"),
            Self::Gentle => write!(f, "gentle"),
        }
    }
}

/// Care stats, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareStats {
    /// Fullness.
    pub hunger: u8,
    /// Mood.
    pub happiness: u8,
    /// Bond with the owner.
    pub affection: u8,
}

impl Default for CareStats {
    fn default() -> Self {
        Self {
            hunger: 50,
            happiness: 50,
            affection: 0,
        }
    }
}

impl CareStats {
    /// Raise affection, saturating at 100.
    pub fn with_affection_bonus(mut self, bonus: u8) -> Self {
        self.affection = self.affection.saturating_add(bonus).min(100);
        self
    }
}

/// A creature the engine wants persisted.
///
/// Fully built in memory before any destructive repository call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCreature {
    /// Owning player.
    pub owner: PlayerId,
    /// Species reference.
    pub species: SpeciesId,
    /// Element, copied from the species at creation.
    pub element: Element,
    /// Temperament.
    pub personality: Personality,
    /// Starting level.
    pub level: u32,
    /// Starting experience toward the next level.
    pub experience: u32,
    /// Starting care stats.
    pub care: CareStats,
}

impl NewCreature {
    /// A level-1 creature with default care stats.
    pub fn hatchling(
        owner: PlayerId,
        species: SpeciesId,
        element: Element,
        personality: Personality,
    ) -> Self {
        Self {
            owner,
            species,
            element,
            personality,
            level: 1,
            experience: 0,
            care: CareStats::default(),
        }
    }
}

/// A persisted, player-owned creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Unique id.
    pub id: CreatureId,
    /// Owning player.
    pub owner: PlayerId,
    /// Species reference.
    pub species: SpeciesId,
    /// Element; may diverge from the species default.
    pub element: Element,
    /// Temperament.
    pub personality: Personality,
    /// Current level.
    pub level: u32,
    /// Experience toward the next level.
    pub experience: u32,
    /// Care stats.
    pub care: CareStats,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Creature {
    /// Materialize a new creature with a fresh id.
    pub fn from_new(new: NewCreature) -> Self {
        Self {
            id: CreatureId::new(),
            owner: new.owner,
            species: new.species,
            element: new.element,
            personality: new.personality,
            level: new.level,
            experience: new.experience,
            care: new.care,
            created_at: Utc::now(),
        }
    }
}
