//! Collection score: a grade-weighted tally of discovered species.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, SpeciesId};
use crate::grade::Grade;

/// Weights used to derive a collection score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Points per discovered species, indexed by [`Grade::index`].
    pub per_grade: [u32; 6],
    /// Extra points per first-discovery claim.
    pub first_discovery_bonus: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            per_grade: [1, 2, 5, 10, 25, 50],
            first_discovery_bonus: 3,
        }
    }
}

impl ScoreWeights {
    /// Points for one discovered species of `grade`.
    pub fn grade_weight(&self, grade: Grade) -> u32 {
        self.per_grade[grade.index()]
    }
}

/// Derive a player's collection score.
///
/// Each distinct discovered species contributes its grade weight; ids the
/// catalog does not know are ignored.
pub fn collection_score<I>(
    catalog: &Catalog,
    discovered: I,
    first_claims: usize,
    weights: &ScoreWeights,
) -> u32
where
    I: IntoIterator<Item = SpeciesId>,
{
    let distinct: HashSet<SpeciesId> = discovered.into_iter().collect();
    let species_points: u32 = distinct
        .into_iter()
        .filter_map(|id| catalog.species(id))
        .map(|sp| weights.grade_weight(sp.grade))
        .sum();
    let claims = u32::try_from(first_claims).unwrap_or(u32::MAX);
    species_points.saturating_add(claims.saturating_mul(weights.first_discovery_bonus))
}
