//! Declarative pool configuration.
//!
//! Each acquisition source is one row: key, weight table, optional lucky
//! table, optional element filter, price. Species resolution follows the
//! same fallback chain for every pool, so there is exactly one place that
//! decides what happens when a filter comes up empty.

use rand::Rng;
use serde::{Deserialize, Serialize};

use cf_core::{Catalog, Element, Grade, Species};

use crate::error::{EngineError, EngineResult};
use crate::ports::Cost;
use crate::sampler::table::GradeTable;

/// Prefix of element-restricted pool keys (`element:fire`).
pub const ELEMENT_POOL_PREFIX: &str = "element:";

/// One acquisition source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Lookup key, e.g. `normal` or `element:ice`.
    pub key: String,
    /// Grade weights used without a luck buff.
    pub table: GradeTable,
    /// Grade weights used while the player's luck buff is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lucky_table: Option<GradeTable>,
    /// Restrict awarded species to this element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Element>,
    /// Price of a single egg.
    pub price: Cost,
}

impl PoolConfig {
    /// A pool over the whole catalog.
    pub fn new(key: impl Into<String>, table: GradeTable, price: Cost) -> Self {
        Self {
            key: key.into(),
            table,
            lucky_table: None,
            element: None,
            price,
        }
    }

    /// Use `table` while a luck buff is active.
    pub fn with_lucky_table(mut self, table: GradeTable) -> Self {
        self.lucky_table = Some(table);
        self
    }

    /// Restrict the pool to one element.
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    /// The table a draw uses given the player's luck state.
    pub fn table_for(&self, luck_active: bool) -> &GradeTable {
        match (&self.lucky_table, luck_active) {
            (Some(lucky), true) => lucky,
            _ => &self.table,
        }
    }

    /// Pick a concrete species at `grade`.
    ///
    /// Tries the pool filter within the grade first, then the pool filter
    /// ignoring grade, then the catalog's default species.
    pub fn resolve_species<'c, R: Rng + ?Sized>(
        &self,
        catalog: &'c Catalog,
        grade: Grade,
        rng: &mut R,
    ) -> &'c Species {
        let in_grade = match self.element {
            Some(element) => catalog.species_by_element_and_grade(element, grade),
            None => catalog.species_by_grade(grade),
        };
        if let Some(sp) = pick(&in_grade, rng) {
            return sp;
        }

        let any_grade: Vec<&Species> = match self.element {
            Some(element) => catalog.species_by_element(element),
            None => catalog.all_species().iter().collect(),
        };
        pick(&any_grade, rng).unwrap_or_else(|| catalog.default_species())
    }
}

fn pick<'c, R: Rng + ?Sized>(candidates: &[&'c Species], rng: &mut R) -> Option<&'c Species> {
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}

/// The set of configured pools, keyed by [`PoolConfig::key`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolRegistry {
    pools: Vec<PoolConfig>,
}

impl PoolRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard pools: `normal`, `premium`, `legendary` and one
    /// `element:<name>` pool per element.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let standard = [
            PoolConfig::new("normal", GradeTable::NORMAL, Cost::gold(100))
                .with_lucky_table(GradeTable::LUCKY),
            PoolConfig::new("premium", GradeTable::PREMIUM, Cost::gems(30)),
            PoolConfig::new("legendary", GradeTable::LEGENDARY, Cost::gems(150)),
        ];
        for pool in standard {
            registry.pools.push(pool);
        }
        for element in Element::ALL {
            registry.pools.push(
                PoolConfig::new(element_pool_key(element), GradeTable::NORMAL, Cost::gold(300))
                    .with_lucky_table(GradeTable::LUCKY)
                    .with_element(element),
            );
        }
        registry
    }

    /// Add a pool, rejecting duplicate keys.
    pub fn insert(&mut self, pool: PoolConfig) -> EngineResult<()> {
        if self.get(&pool.key).is_some() {
            return Err(EngineError::InvalidConfig(format!(
                "duplicate pool key: {}",
                pool.key
            )));
        }
        self.pools.push(pool);
        Ok(())
    }

    /// Builder form of [`PoolRegistry::insert`].
    pub fn with_pool(mut self, pool: PoolConfig) -> EngineResult<Self> {
        self.insert(pool)?;
        Ok(self)
    }

    /// Look up a pool by key.
    pub fn get(&self, key: &str) -> Option<&PoolConfig> {
        self.pools.iter().find(|p| p.key == key)
    }

    /// All pools in registration order.
    pub fn pools(&self) -> &[PoolConfig] {
        &self.pools
    }
}

/// Key of the element-restricted pool for `element`.
pub fn element_pool_key(element: Element) -> String {
    format!("{ELEMENT_POOL_PREFIX}{element}")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use cf_core::{CatalogDocument, SpeciesId};

    use super::*;

    fn sparse_catalog() -> Catalog {
        Catalog::from_document(CatalogDocument {
            species: vec![
                Species::new(1, "Puddlet", Element::Water, Grade::Common),
                Species::new(2, "Coralisk", Element::Water, Grade::Rare),
                Species::new(3, "Emberkit", Element::Fire, Grade::Common),
                Species::new(4, "Solflare", Element::Fire, Grade::Legendary),
            ],
            default_species: SpeciesId(1),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn builtin_has_all_pools() {
        let reg = PoolRegistry::builtin();
        assert!(reg.get("normal").is_some());
        assert!(reg.get("premium").is_some());
        assert!(reg.get("legendary").is_some());
        for element in Element::ALL {
            let pool = reg.get(&element_pool_key(element)).unwrap();
            assert_eq!(pool.element, Some(element));
        }
        assert_eq!(reg.pools().len(), 3 + Element::ALL.len());
    }

    #[test]
    fn duplicate_keys_rejected() {
        let mut reg = PoolRegistry::builtin();
        let dup = PoolConfig::new("normal", GradeTable::NORMAL, Cost::default());
        assert!(reg.insert(dup).is_err());
    }

    #[test]
    fn lucky_table_only_when_configured() {
        let reg = PoolRegistry::builtin();
        let normal = reg.get("normal").unwrap();
        assert_eq!(normal.table_for(true), &GradeTable::LUCKY);
        assert_eq!(normal.table_for(false), &GradeTable::NORMAL);
        let premium = reg.get("premium").unwrap();
        assert_eq!(premium.table_for(true), &GradeTable::PREMIUM);
    }

    #[test]
    fn element_pool_prefers_grade_match() {
        let catalog = sparse_catalog();
        let pool = PoolConfig::new("fire", GradeTable::NORMAL, Cost::default())
            .with_element(Element::Fire);
        let mut rng = StdRng::seed_from_u64(3);
        let sp = pool.resolve_species(&catalog, Grade::Legendary, &mut rng);
        assert_eq!(sp.id, SpeciesId(4));
    }

    #[test]
    fn element_pool_falls_back_to_any_grade_of_element() {
        let catalog = sparse_catalog();
        let pool = PoolConfig::new("fire", GradeTable::NORMAL, Cost::default())
            .with_element(Element::Fire);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let sp = pool.resolve_species(&catalog, Grade::Epic, &mut rng);
            assert_eq!(sp.element, Element::Fire);
        }
    }

    #[test]
    fn empty_element_falls_back_to_default_species() {
        let catalog = sparse_catalog();
        let pool = PoolConfig::new("ice", GradeTable::NORMAL, Cost::default())
            .with_element(Element::Ice);
        let mut rng = StdRng::seed_from_u64(3);
        let sp = pool.resolve_species(&catalog, Grade::Rare, &mut rng);
        assert_eq!(sp.id, SpeciesId(1));
    }

    #[test]
    fn unrestricted_pool_falls_back_to_whole_catalog() {
        let catalog = sparse_catalog();
        let pool = PoolConfig::new("normal", GradeTable::NORMAL, Cost::default());
        let mut rng = StdRng::seed_from_u64(3);
        // no mythic species in the sparse catalog
        let sp = pool.resolve_species(&catalog, Grade::Mythic, &mut rng);
        assert!(catalog.species(sp.id).is_some());
    }
}
