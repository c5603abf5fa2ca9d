use crate::catalog::{MaterialId, SpeciesId};

/// Alias for `Result<T, CatalogError>`.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while loading or validating a catalog.
///
/// These surface at startup; a loaded [`crate::Catalog`] is immutable and
/// never produces them mid-request.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Two species share the same id.
    #[error("duplicate species id: {0}")]
    DuplicateSpecies(SpeciesId),

    /// Two materials share the same id.
    #[error("duplicate material id: {0}")]
    DuplicateMaterial(MaterialId),

    /// A recipe or default references a species that is not in the catalog.
    #[error("unknown species id: {0}")]
    UnknownSpecies(SpeciesId),

    /// Two recipes claim the same unordered input pair.
    #[error("conflicting recipes for pair ({0}, {1})")]
    ConflictingRecipe(SpeciesId, SpeciesId),

    /// The catalog has no species at all.
    #[error("catalog has no species")]
    Empty,

    /// A material effect is out of range.
    #[error("invalid material {id}: {reason}")]
    InvalidMaterial {
        /// The offending material.
        id: MaterialId,
        /// What is wrong with it.
        reason: String,
    },

    /// The catalog document could not be parsed.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
