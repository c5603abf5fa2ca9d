//! Error types for the acquisition and synthesis engine.

use cf_core::{CreatureId, Grade, MaterialId, SpeciesId};
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type for collaborator (port) calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by external collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or refused the call.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A record the call relies on does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Filesystem failure in a file-backed store.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted document could not be encoded or decoded.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Broad class of an [`EngineError`], so callers can pick the right UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any mutation.
    Validation,
    /// The player cannot afford the request.
    Resource,
    /// The inputs have no valid synthesis outcome.
    Domain,
    /// A collaborator failed mid-request.
    Persistence,
    /// The engine was built with invalid configuration.
    Config,
}

/// Errors that can occur while hatching or synthesizing.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced creature does not exist.
    #[error("creature not found: {0}")]
    CreatureNotFound(CreatureId),

    /// A referenced creature belongs to someone else.
    #[error("creature {0} is not owned by the requesting player")]
    NotOwner(CreatureId),

    /// Both merge inputs are the same creature.
    #[error("cannot synthesize a creature with itself")]
    IdenticalCreatures,

    /// An input creature is exploring or training.
    #[error("creature is busy with another activity")]
    CreatureBusy,

    /// The material id is not in the catalog.
    #[error("unknown material: {0}")]
    UnknownMaterial(MaterialId),

    /// The pool key is not configured.
    #[error("unknown pool: {0}")]
    UnknownPool(String),

    /// A creature references a species the catalog does not know.
    #[error("unknown species: {0}")]
    UnknownSpecies(SpeciesId),

    /// Hatch quantity outside `1..=max`.
    #[error("invalid quantity {requested} (allowed 1-{max})")]
    InvalidQuantity {
        /// Quantity asked for.
        requested: u32,
        /// Configured batch limit.
        max: u32,
    },

    /// The player's balance does not cover the price.
    #[error("insufficient currency")]
    InsufficientCurrency,

    /// The player holds no unit of the material.
    #[error("insufficient material: {0}")]
    InsufficientMaterial(MaterialId),

    /// A same-species merge at the top of the upgrade ladder.
    #[error("{0} creatures cannot be upgraded any further")]
    MaxGrade(Grade),

    /// Two different species with no recipe.
    #[error("no synthesis path for species {first} and {second}")]
    NoSynthesisPath {
        /// First input species.
        first: SpeciesId,
        /// Second input species.
        second: SpeciesId,
    },

    /// Invalid engine configuration (weight tables, pools).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A collaborator call failed.
    #[error("persistence failure: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CreatureNotFound(_)
            | Self::NotOwner(_)
            | Self::IdenticalCreatures
            | Self::CreatureBusy
            | Self::UnknownMaterial(_)
            | Self::UnknownPool(_)
            | Self::UnknownSpecies(_)
            | Self::InvalidQuantity { .. } => ErrorKind::Validation,
            Self::InsufficientCurrency | Self::InsufficientMaterial(_) => ErrorKind::Resource,
            Self::MaxGrade(_) | Self::NoSynthesisPath { .. } => ErrorKind::Domain,
            Self::Store(_) => ErrorKind::Persistence,
            Self::InvalidConfig(_) => ErrorKind::Config,
        }
    }

    /// Stable machine-readable code for API responses and analytics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CreatureNotFound(_) => "creature_not_found",
            Self::NotOwner(_) => "not_owner",
            Self::IdenticalCreatures => "identical_creatures",
            Self::CreatureBusy => "creature_busy",
            Self::UnknownMaterial(_) => "unknown_material",
            Self::UnknownPool(_) => "unknown_pool",
            Self::UnknownSpecies(_) => "unknown_species",
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::InsufficientCurrency => "insufficient_currency",
            Self::InsufficientMaterial(_) => "insufficient_material",
            Self::MaxGrade(_) => "max_grade",
            Self::NoSynthesisPath { .. } => "no_synthesis_path",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Store(_) => "persistence",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_and_domain_errors_are_distinct() {
        let resource = EngineError::InsufficientMaterial(MaterialId(5));
        let domain = EngineError::MaxGrade(Grade::Legendary);
        assert_eq!(resource.kind(), ErrorKind::Resource);
        assert_eq!(domain.kind(), ErrorKind::Domain);
        assert_eq!(resource.code(), "insufficient_material");
        assert_eq!(domain.code(), "max_grade");
    }

    #[test]
    fn store_errors_convert() {
        let err: EngineError = StoreError::Unavailable("db down".into()).into();
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(err.to_string(), "persistence failure: store unavailable: db down");
    }

    #[test]
    fn validation_codes_are_stable() {
        let codes: Vec<&str> = [
            EngineError::IdenticalCreatures,
            EngineError::CreatureBusy,
            EngineError::UnknownPool("golden".into()),
            EngineError::InsufficientCurrency,
        ]
        .iter()
        .map(EngineError::code)
        .collect();
        insta::assert_snapshot!(
            codes.join(","),
            @"identical_creatures,creature_busy,unknown_pool,insufficient_currency"
        );
    }

    #[test]
    fn messages_read_well() {
        assert_eq!(
            EngineError::MaxGrade(Grade::Legendary).to_string(),
            "legendary creatures cannot be upgraded any further"
        );
        assert_eq!(
            EngineError::InvalidQuantity {
                requested: 0,
                max: 10
            }
            .to_string(),
            "invalid quantity 0 (allowed 1-10)"
        );
    }
}
