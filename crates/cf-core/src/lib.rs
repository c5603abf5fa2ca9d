//! Core types for Critterforge: grades, elements, the species catalog, and
//! player-owned creatures.
//!
//! This crate holds the static reference data the acquisition and synthesis
//! engine reads, plus the pure helpers (leveling, collection score) shared by
//! every flow that touches creatures. It performs no I/O beyond parsing a
//! catalog document.

/// Species, recipes, materials and the indexed catalog.
pub mod catalog;
/// Creature instances, player and creature identifiers.
pub mod creature;
/// Error types used throughout the crate.
pub mod error;
/// Rarity grades and elements.
pub mod grade;
/// Experience and level progression.
pub mod leveling;
/// Collection score derivation.
pub mod score;

/// Re-export catalog types.
pub use catalog::{
    Catalog, CatalogDocument, ForcedOutcome, Material, MaterialEffect, MaterialId, Recipe,
    Species, SpeciesId,
};
/// Re-export creature types.
pub use creature::{CareStats, Creature, CreatureId, NewCreature, Personality, PlayerId};
/// Re-export error types.
pub use error::{CatalogError, CatalogResult};
/// Re-export grade types.
pub use grade::{Element, Grade};
/// Re-export leveling helpers.
pub use leveling::{LevelProgress, MAX_LEVEL, apply_experience};
/// Re-export score helpers.
pub use score::{ScoreWeights, collection_score};
