//! Weighted grade sampling and species resolution for egg pools.

pub mod pool;
pub mod table;

use rand::Rng;

use cf_core::Grade;

pub use pool::{PoolConfig, PoolRegistry, element_pool_key};
pub use table::GradeTable;

/// Draw a natural grade from `pool`.
///
/// The lucky table replaces the regular one only when the buff is active
/// and the pool defines one. Element pools sample from their own
/// (unrestricted) table here; the element filter applies afterwards in
/// [`PoolConfig::resolve_species`].
pub fn sample_grade<R: Rng + ?Sized>(pool: &PoolConfig, luck_active: bool, rng: &mut R) -> Grade {
    pool.table_for(luck_active).sample(rng)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::ports::Cost;

    #[test]
    fn luck_shifts_mass_toward_rare() {
        let pool = PoolConfig::new("normal", GradeTable::NORMAL, Cost::default())
            .with_lucky_table(GradeTable::LUCKY);
        let mut rng = StdRng::seed_from_u64(11);
        let draws = 20_000;
        let rare_plus = |luck: bool, rng: &mut StdRng| {
            (0..draws)
                .filter(|_| sample_grade(&pool, luck, rng) >= Grade::Rare)
                .count()
        };
        let plain = rare_plus(false, &mut rng);
        let lucky = rare_plus(true, &mut rng);
        assert!(lucky > plain, "lucky {lucky} should beat plain {plain}");
    }
}
