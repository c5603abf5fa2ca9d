//! Merge resolution: which species two inputs produce.
//!
//! Resolution order is fixed. A recipe for the unordered species pair wins
//! first, even when both inputs are the same species. Otherwise a
//! same-species pair upgrades to the next grade, and anything else has no
//! path. Mutation runs only after the base outcome is known.

pub mod odds;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use cf_core::{Catalog, Element, Grade, MaterialEffect, Species, SpeciesId};

use crate::error::{EngineError, EngineResult};

pub use odds::{ChanceCurve, SynthesisOdds, roll_percent};

/// Which rule produced the base outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeType {
    /// Same species, next grade up.
    GradeUpgrade,
    /// Recipe lookup.
    Combination,
}

impl fmt::Display for MergeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GradeUpgrade => write!(f, "grade upgrade"),
            Self::Combination => write!(f, "combination"),
        }
    }
}

/// Base outcome of a merge before sub-rolls.
#[derive(Debug, Clone, Copy)]
pub struct MergePlan<'c> {
    /// Path taken.
    pub merge_type: MergeType,
    /// Species produced.
    pub species: &'c Species,
    /// Whether a material's grade boost pushed the upgrade one step further.
    pub boosted: bool,
}

/// Decide the base outcome for two input species.
pub fn resolve_merge<'c, R: Rng + ?Sized>(
    catalog: &'c Catalog,
    first: &Species,
    second: &Species,
    effect: Option<&MaterialEffect>,
    rng: &mut R,
) -> EngineResult<MergePlan<'c>> {
    if let Some(result) = catalog.recipe_for(first.id, second.id) {
        let species = catalog
            .species(result)
            .ok_or(EngineError::UnknownSpecies(result))?;
        return Ok(MergePlan {
            merge_type: MergeType::Combination,
            species,
            boosted: false,
        });
    }

    if first.id != second.id {
        return Err(EngineError::NoSynthesisPath {
            first: first.id,
            second: second.id,
        });
    }

    let mut target = first
        .grade
        .upgrade_target()
        .ok_or(EngineError::MaxGrade(first.grade))?;

    let mut boosted = false;
    if let Some(effect) = effect {
        if effect.grade_boost > 0.0 && roll_percent(effect.grade_boost, rng) {
            if let Some(higher) = target.upgrade_target() {
                target = higher;
                boosted = true;
            }
        }
    }

    let species = pick_in_grade(catalog, target, first.element, None, rng).ok_or(
        EngineError::NoSynthesisPath {
            first: first.id,
            second: second.id,
        },
    )?;

    Ok(MergePlan {
        merge_type: MergeType::GradeUpgrade,
        species,
        boosted,
    })
}

/// A rarer (or, at the top, different) species to replace `base` with.
///
/// Aims one grade above `base` along the upgrade ladder; at legendary and
/// above it looks for another species of the same grade. Returns `None`
/// when the catalog has no candidate.
pub fn mutate<'c, R: Rng + ?Sized>(
    catalog: &'c Catalog,
    base: &Species,
    rng: &mut R,
) -> Option<&'c Species> {
    match base.grade.upgrade_target() {
        Some(higher) => pick_in_grade(catalog, higher, base.element, None, rng),
        None => pick_in_grade(catalog, base.grade, base.element, Some(base.id), rng),
    }
}

/// Pick a species of `grade`, preferring `element`, never `exclude`.
fn pick_in_grade<'c, R: Rng + ?Sized>(
    catalog: &'c Catalog,
    grade: Grade,
    element: Element,
    exclude: Option<SpeciesId>,
    rng: &mut R,
) -> Option<&'c Species> {
    let keep = |sp: &&Species| Some(sp.id) != exclude;

    let same_element: Vec<&Species> = catalog
        .species_by_element_and_grade(element, grade)
        .into_iter()
        .filter(keep)
        .collect();
    let candidates = if same_element.is_empty() {
        catalog
            .species_by_grade(grade)
            .into_iter()
            .filter(keep)
            .collect()
    } else {
        same_element
    };

    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.random_range(0..candidates.len())])
    }
}
