//! Rarity grades and elements.
//!
//! Grades form a strict total order from `Common` to `Mythic`. The derive
//! order of the variants *is* the rarity order, so `Ord` comparisons are
//! the same comparisons pity floors and synthesis ladders use.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rarity tier of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// Most frequent tier.
    Common,
    /// Slightly rarer than common.
    Uncommon,
    /// First tier that resets pity.
    Rare,
    /// High tier.
    Epic,
    /// Top tier reachable through synthesis.
    Legendary,
    /// Acquisition-only tier; never produced by a grade upgrade.
    Mythic,
}

impl Grade {
    /// All grades in ascending rarity order.
    pub const ALL: [Grade; 6] = [
        Grade::Common,
        Grade::Uncommon,
        Grade::Rare,
        Grade::Epic,
        Grade::Legendary,
        Grade::Mythic,
    ];

    /// Position of this grade in [`Grade::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Common => 0,
            Self::Uncommon => 1,
            Self::Rare => 2,
            Self::Epic => 3,
            Self::Legendary => 4,
            Self::Mythic => 5,
        }
    }

    /// The next grade up, or `None` at `Mythic`.
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The grade a same-species merge produces.
    ///
    /// The synthesis ladder ends at `Legendary`: merging two legendaries (or
    /// two mythics) has no upgrade target.
    pub fn upgrade_target(self) -> Option<Self> {
        match self {
            Self::Legendary | Self::Mythic => None,
            other => other.next(),
        }
    }

    /// Parse a grade from a user-supplied string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "common" => Some(Self::Common),
            "uncommon" => Some(Self::Uncommon),
            "rare" => Some(Self::Rare),
            "epic" => Some(Self::Epic),
            "legendary" => Some(Self::Legendary),
            "mythic" | "mythical" => Some(Self::Mythic),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => write!(f, "common"),
            Self::Uncommon => write!(f, "uncommon"),
            Self::Rare => write!(f, "rare"),
            Self::Epic => write!(f, "epic"),
            Self::Legendary => write!(f, "legendary"),
            Self::Mythic => write!(f, "mythic"),
        }
    }
}

/// Elemental affinity of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Water.
    Water,
    /// Fire.
    Fire,
    /// Grass.
    Grass,
    /// Light.
    Light,
    /// Dark.
    Dark,
    /// Ice.
    Ice,
    /// Electric.
    Electric,
    /// Poison.
    Poison,
    /// Earth.
    Earth,
    /// Wind.
    Wind,
    /// Celestial.
    Celestial,
}

impl Element {
    /// Every element, in catalog order.
    pub const ALL: [Element; 11] = [
        Element::Water,
        Element::Fire,
        Element::Grass,
        Element::Light,
        Element::Dark,
        Element::Ice,
        Element::Electric,
        Element::Poison,
        Element::Earth,
        Element::Wind,
        Element::Celestial,
    ];

    /// Parse an element name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|e| e.to_string() == lower)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Water => "water",
            Self::Fire => "fire",
            Self::Grass => "grass",
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Ice => "ice",
            Self::Electric => "electric",
            Self::Poison => "poison",
            Self::Earth => "earth",
            Self::Wind => "wind",
            Self::Celestial => "celestial",
        };
        f.write_str(name)
    }
}
