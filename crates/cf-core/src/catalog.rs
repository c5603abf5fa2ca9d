use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::grade::{Element, Grade};

const BUILTIN_CATALOG: &str = include_str!("data/catalog.json");

/// Numeric identifier of a species in the catalog.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SpeciesId(pub u32);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Numeric identifier of a synthesis material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u32);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// Catalog id.
    pub id: SpeciesId,
    /// Display name.
    pub name: String,
    /// Localized display name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    /// Elemental affinity.
    pub element: Element,
    /// Rarity grade.
    pub grade: Grade,
}

impl Species {
    /// Create a species without a localized name.
    pub fn new(id: u32, name: impl Into<String>, element: Element, grade: Grade) -> Self {
        Self {
            id: SpeciesId(id),
            name: name.into(),
            local_name: None,
            element,
            grade,
        }
    }
}

/// An unordered pair of inputs that combines into `result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// One input species.
    pub first: SpeciesId,
    /// The other input species.
    pub second: SpeciesId,
    /// The species the combination produces.
    pub result: SpeciesId,
}

/// A sub-roll a material can force to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForcedOutcome {
    /// The mutation sub-roll always succeeds.
    Mutation,
    /// The great-success sub-roll always succeeds.
    GreatSuccess,
}

/// What consuming a material does to a synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialEffect {
    /// Percentage points added to the mutation chance (0-100).
    #[serde(default)]
    pub mutation_bonus: f64,
    /// Percent chance (0-100) that a grade upgrade skips one extra grade.
    #[serde(default)]
    pub grade_boost: f64,
    /// Sub-roll this material forces, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<ForcedOutcome>,
}

/// A consumable synthesis input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Catalog id.
    pub id: MaterialId,
    /// Display name.
    pub name: String,
    /// Effect on the synthesis it is consumed by.
    #[serde(default)]
    pub effect: MaterialEffect,
}

/// Serialized form of a catalog, as stored in JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Every species.
    pub species: Vec<Species>,
    /// Combination recipes.
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    /// Synthesis materials.
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Species awarded when every fallback comes up empty.
    pub default_species: SpeciesId,
}

/// Read-only reference data: species, recipes and materials.
///
/// Built once at startup and shared behind an `Arc`. Lookups preserve
/// catalog order so seeded draws are reproducible.
#[derive(Debug, Clone)]
pub struct Catalog {
    species: Vec<Species>,
    materials: Vec<Material>,
    default_species: SpeciesId,

    // Indexes
    by_id: HashMap<SpeciesId, usize>,
    by_grade: HashMap<Grade, Vec<usize>>,
    by_element: HashMap<Element, Vec<usize>>,
    recipes: HashMap<(SpeciesId, SpeciesId), SpeciesId>,
    materials_by_id: HashMap<MaterialId, usize>,
}

fn pair_key(a: SpeciesId, b: SpeciesId) -> (SpeciesId, SpeciesId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Catalog {
    /// Validate a document and build the indexed catalog.
    pub fn from_document(doc: CatalogDocument) -> CatalogResult<Self> {
        if doc.species.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut by_id = HashMap::new();
        let mut by_grade: HashMap<Grade, Vec<usize>> = HashMap::new();
        let mut by_element: HashMap<Element, Vec<usize>> = HashMap::new();
        for (idx, sp) in doc.species.iter().enumerate() {
            if by_id.insert(sp.id, idx).is_some() {
                return Err(CatalogError::DuplicateSpecies(sp.id));
            }
            by_grade.entry(sp.grade).or_default().push(idx);
            by_element.entry(sp.element).or_default().push(idx);
        }

        if !by_id.contains_key(&doc.default_species) {
            return Err(CatalogError::UnknownSpecies(doc.default_species));
        }

        let mut recipes = HashMap::new();
        for recipe in &doc.recipes {
            for id in [recipe.first, recipe.second, recipe.result] {
                if !by_id.contains_key(&id) {
                    return Err(CatalogError::UnknownSpecies(id));
                }
            }
            let key = pair_key(recipe.first, recipe.second);
            if recipes.insert(key, recipe.result).is_some() {
                return Err(CatalogError::ConflictingRecipe(key.0, key.1));
            }
        }

        let mut materials_by_id = HashMap::new();
        for (idx, mat) in doc.materials.iter().enumerate() {
            validate_effect(mat)?;
            if materials_by_id.insert(mat.id, idx).is_some() {
                return Err(CatalogError::DuplicateMaterial(mat.id));
            }
        }

        Ok(Self {
            species: doc.species,
            materials: doc.materials,
            default_species: doc.default_species,
            by_id,
            by_grade,
            by_element,
            recipes,
            materials_by_id,
        })
    }

    /// Parse and validate a JSON catalog document.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Serialize back into a document.
    pub fn to_document(&self) -> CatalogDocument {
        let mut recipes: Vec<Recipe> = self
            .recipes
            .iter()
            .map(|(&(first, second), &result)| Recipe {
                first,
                second,
                result,
            })
            .collect();
        recipes.sort_by_key(|r| (r.first, r.second));
        CatalogDocument {
            species: self.species.clone(),
            recipes,
            materials: self.materials.clone(),
            default_species: self.default_species,
        }
    }

    // -----------------------------------------------------------------------
    // Species lookups
    // -----------------------------------------------------------------------

    /// Look up a species by id.
    pub fn species(&self, id: SpeciesId) -> Option<&Species> {
        self.by_id.get(&id).map(|&idx| &self.species[idx])
    }

    /// All species in catalog order.
    pub fn all_species(&self) -> &[Species] {
        &self.species
    }

    /// Species of a grade, in catalog order.
    pub fn species_by_grade(&self, grade: Grade) -> Vec<&Species> {
        self.collect(self.by_grade.get(&grade))
    }

    /// Species of an element, in catalog order.
    pub fn species_by_element(&self, element: Element) -> Vec<&Species> {
        self.collect(self.by_element.get(&element))
    }

    /// Species matching both an element and a grade, in catalog order.
    pub fn species_by_element_and_grade(&self, element: Element, grade: Grade) -> Vec<&Species> {
        self.species_by_element(element)
            .into_iter()
            .filter(|sp| sp.grade == grade)
            .collect()
    }

    /// The last-resort species.
    pub fn default_species(&self) -> &Species {
        // from_document guarantees the default is indexed
        &self.species[self.by_id[&self.default_species]]
    }

    fn collect(&self, indexes: Option<&Vec<usize>>) -> Vec<&Species> {
        indexes
            .map(|idx| idx.iter().map(|&i| &self.species[i]).collect())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Recipes & materials
    // -----------------------------------------------------------------------

    /// Result of combining `a` and `b`, in either order.
    pub fn recipe_for(&self, a: SpeciesId, b: SpeciesId) -> Option<SpeciesId> {
        self.recipes.get(&pair_key(a, b)).copied()
    }

    /// Number of registered recipes.
    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    /// Look up a material by id.
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials_by_id.get(&id).map(|&idx| &self.materials[idx])
    }

    /// All materials in catalog order.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }
}

fn validate_effect(mat: &Material) -> CatalogResult<()> {
    let check = |value: f64, field: &str| {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Ok(())
        } else {
            Err(CatalogError::InvalidMaterial {
                id: mat.id,
                reason: format!("{field} must be within 0-100, got {value}"),
            })
        }
    };
    check(mat.effect.mutation_bonus, "mutation_bonus")?;
    check(mat.effect.grade_boost, "grade_boost")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_doc() -> CatalogDocument {
        CatalogDocument {
            species: vec![
                Species::new(1, "Puddlet", Element::Water, Grade::Common),
                Species::new(2, "Emberkit", Element::Fire, Grade::Common),
                Species::new(3, "Tidefin", Element::Water, Grade::Uncommon),
                Species::new(4, "Steamcoil", Element::Water, Grade::Rare),
            ],
            recipes: vec![Recipe {
                first: SpeciesId(2),
                second: SpeciesId(1),
                result: SpeciesId(4),
            }],
            materials: vec![Material {
                id: MaterialId(5),
                name: "Moonstone".into(),
                effect: MaterialEffect {
                    mutation_bonus: 10.0,
                    ..Default::default()
                },
            }],
            default_species: SpeciesId(1),
        }
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.all_species().is_empty());
        for grade in Grade::ALL {
            assert!(
                !catalog.species_by_grade(grade).is_empty(),
                "builtin catalog has no {grade} species"
            );
        }
        for element in Element::ALL {
            assert!(
                !catalog.species_by_element(element).is_empty(),
                "builtin catalog has no {element} species"
            );
        }
    }

    #[test]
    fn recipe_lookup_is_unordered() {
        let catalog = Catalog::from_document(small_doc()).unwrap();
        assert_eq!(catalog.recipe_for(SpeciesId(1), SpeciesId(2)), Some(SpeciesId(4)));
        assert_eq!(catalog.recipe_for(SpeciesId(2), SpeciesId(1)), Some(SpeciesId(4)));
        assert_eq!(catalog.recipe_for(SpeciesId(1), SpeciesId(3)), None);
    }

    #[test]
    fn element_and_grade_filter() {
        let catalog = Catalog::from_document(small_doc()).unwrap();
        let water_common = catalog.species_by_element_and_grade(Element::Water, Grade::Common);
        assert_eq!(water_common.len(), 1);
        assert_eq!(water_common[0].name, "Puddlet");
        assert!(
            catalog
                .species_by_element_and_grade(Element::Fire, Grade::Rare)
                .is_empty()
        );
    }

    #[test]
    fn duplicate_species_rejected() {
        let mut doc = small_doc();
        doc.species.push(Species::new(1, "Copycat", Element::Dark, Grade::Epic));
        assert!(matches!(
            Catalog::from_document(doc),
            Err(CatalogError::DuplicateSpecies(SpeciesId(1)))
        ));
    }

    #[test]
    fn conflicting_recipe_rejected() {
        let mut doc = small_doc();
        doc.recipes.push(Recipe {
            first: SpeciesId(1),
            second: SpeciesId(2),
            result: SpeciesId(3),
        });
        assert!(matches!(
            Catalog::from_document(doc),
            Err(CatalogError::ConflictingRecipe(SpeciesId(1), SpeciesId(2)))
        ));
    }

    #[test]
    fn unknown_default_rejected() {
        let mut doc = small_doc();
        doc.default_species = SpeciesId(99);
        assert!(matches!(
            Catalog::from_document(doc),
            Err(CatalogError::UnknownSpecies(SpeciesId(99)))
        ));
    }

    #[test]
    fn out_of_range_material_rejected() {
        let mut doc = small_doc();
        doc.materials[0].effect.grade_boost = 140.0;
        assert!(matches!(
            Catalog::from_document(doc),
            Err(CatalogError::InvalidMaterial { .. })
        ));
    }

    #[test]
    fn empty_catalog_rejected() {
        assert!(matches!(
            Catalog::from_document(CatalogDocument::default()),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn document_round_trip_through_json() {
        let catalog = Catalog::from_document(small_doc()).unwrap();
        let json = serde_json::to_string(&catalog.to_document()).unwrap();
        let reloaded = Catalog::from_json(&json).unwrap();
        assert_eq!(reloaded.all_species(), catalog.all_species());
        assert_eq!(reloaded.recipe_count(), 1);
        assert_eq!(reloaded.material(MaterialId(5)).unwrap().name, "Moonstone");
    }
}
