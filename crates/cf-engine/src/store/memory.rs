//! In-memory store implementing every engine port.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use cf_core::{
    Catalog, Creature, CreatureId, MaterialId, NewCreature, PlayerId, ScoreWeights, SpeciesId,
    collection_score,
};

use crate::error::{StoreError, StoreResult};
use crate::ports::{
    ActivityLock, BuffStore, CodexStore, Cost, CreatureRepository, Ledger, Mission,
    MissionTracker, PityStore,
};

/// An operation that can be told to fail once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    /// `Ledger::spend_currency`.
    SpendCurrency,
    /// `Ledger::add_currency`.
    AddCurrency,
    /// `Ledger::consume_material`.
    ConsumeMaterial,
    /// `Ledger::add_material`.
    AddMaterial,
    /// `CreatureRepository::create` and `replace`.
    Create,
    /// `CreatureRepository::delete`.
    Delete,
    /// `CodexStore::add_discovery_entry`.
    DiscoveryEntry,
    /// `CodexStore::collection_score`.
    CollectionScore,
    /// `PityStore::increment`.
    PityIncrement,
    /// `PityStore::reset`.
    PityReset,
}

impl fmt::Display for FailPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SpendCurrency => "spend_currency",
            Self::AddCurrency => "add_currency",
            Self::ConsumeMaterial => "consume_material",
            Self::AddMaterial => "add_material",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::DiscoveryEntry => "add_discovery_entry",
            Self::CollectionScore => "collection_score",
            Self::PityIncrement => "pity_increment",
            Self::PityReset => "pity_reset",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Default)]
struct State {
    balances: HashMap<PlayerId, Cost>,
    materials: HashMap<(PlayerId, MaterialId), u32>,
    creatures: HashMap<CreatureId, Creature>,
    discovered: HashMap<PlayerId, HashSet<SpeciesId>>,
    first_claims: HashSet<(PlayerId, SpeciesId)>,
    busy: HashSet<CreatureId>,
    lucky: HashSet<PlayerId>,
    pity: HashMap<(PlayerId, String), u32>,
    missions: HashMap<(PlayerId, Mission), u32>,
    failures: HashSet<FailPoint>,
}

impl State {
    fn check(&mut self, point: FailPoint) -> StoreResult<()> {
        if self.failures.remove(&point) {
            return Err(StoreError::Unavailable(format!("injected failure: {point}")));
        }
        Ok(())
    }
}

/// Every port in one mutex-guarded map set.
///
/// Each call takes the lock once, so guarded operations (spend, consume,
/// pity increment, first-discovery claim) are atomic.
#[derive(Debug)]
pub struct MemoryStore {
    catalog: Arc<Catalog>,
    weights: ScoreWeights,
    state: Mutex<State>,
}

impl MemoryStore {
    /// An empty store scoring against `catalog`.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            weights: ScoreWeights::default(),
            state: Mutex::new(State::default()),
        }
    }

    /// Use custom collection-score weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make the next call through `point` fail.
    pub fn fail_next(&self, point: FailPoint) {
        self.state().failures.insert(point);
    }

    /// Credit currency directly.
    pub fn grant_currency(&self, player: PlayerId, amount: Cost) {
        let mut state = self.state();
        let balance = state.balances.entry(player).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Credit material units directly.
    pub fn grant_material(&self, player: PlayerId, material: MaterialId, quantity: u32) {
        let mut state = self.state();
        let held = state.materials.entry((player, material)).or_default();
        *held = held.saturating_add(quantity);
    }

    /// Insert a creature as-is, bypassing fail points.
    pub fn insert_creature(&self, creature: NewCreature) -> Creature {
        let creature = Creature::from_new(creature);
        self.state().creatures.insert(creature.id, creature.clone());
        creature
    }

    /// Mark a creature as engaged in another activity, or free it.
    pub fn set_busy(&self, creature: CreatureId, busy: bool) {
        let mut state = self.state();
        if busy {
            state.busy.insert(creature);
        } else {
            state.busy.remove(&creature);
        }
    }

    /// Switch the luck buff on or off.
    pub fn set_luck(&self, player: PlayerId, active: bool) {
        let mut state = self.state();
        if active {
            state.lucky.insert(player);
        } else {
            state.lucky.remove(&player);
        }
    }

    /// Set a pity counter directly.
    pub fn set_pity(&self, player: PlayerId, pool: &str, count: u32) {
        self.state().pity.insert((player, pool.to_string()), count);
    }

    /// Current balance.
    pub fn balance(&self, player: PlayerId) -> Cost {
        self.state()
            .balances
            .get(&player)
            .copied()
            .unwrap_or_default()
    }

    /// Units of `material` held.
    pub fn material_count(&self, player: PlayerId, material: MaterialId) -> u32 {
        self.state()
            .materials
            .get(&(player, material))
            .copied()
            .unwrap_or(0)
    }

    /// A player's creatures, oldest first.
    pub fn creatures_of(&self, player: PlayerId) -> Vec<Creature> {
        let mut owned: Vec<Creature> = self
            .state()
            .creatures
            .values()
            .filter(|c| c.owner == player)
            .cloned()
            .collect();
        owned.sort_by_key(|c| c.created_at);
        owned
    }

    /// Species a player has discovered.
    pub fn discovered(&self, player: PlayerId) -> HashSet<SpeciesId> {
        self.state()
            .discovered
            .get(&player)
            .cloned()
            .unwrap_or_default()
    }

    /// Progress on a mission counter.
    pub fn mission_count(&self, player: PlayerId, mission: Mission) -> u32 {
        self.state()
            .missions
            .get(&(player, mission))
            .copied()
            .unwrap_or(0)
    }
}

impl Ledger for MemoryStore {
    fn spend_currency(&self, player: PlayerId, cost: Cost) -> StoreResult<bool> {
        let mut state = self.state();
        state.check(FailPoint::SpendCurrency)?;
        let balance = state.balances.entry(player).or_default();
        if !balance.covers(&cost) {
            return Ok(false);
        }
        *balance = balance.saturating_sub(cost);
        Ok(true)
    }

    fn add_currency(&self, player: PlayerId, amount: Cost) -> StoreResult<()> {
        let mut state = self.state();
        state.check(FailPoint::AddCurrency)?;
        let balance = state.balances.entry(player).or_default();
        *balance = balance.saturating_add(amount);
        Ok(())
    }

    fn consume_material(
        &self,
        player: PlayerId,
        material: MaterialId,
        quantity: u32,
    ) -> StoreResult<bool> {
        let mut state = self.state();
        state.check(FailPoint::ConsumeMaterial)?;
        let held = state.materials.entry((player, material)).or_default();
        if *held < quantity {
            return Ok(false);
        }
        *held -= quantity;
        Ok(true)
    }

    fn add_material(
        &self,
        player: PlayerId,
        material: MaterialId,
        quantity: u32,
    ) -> StoreResult<()> {
        let mut state = self.state();
        state.check(FailPoint::AddMaterial)?;
        let held = state.materials.entry((player, material)).or_default();
        *held = held.saturating_add(quantity);
        Ok(())
    }
}

impl CreatureRepository for MemoryStore {
    fn create(&self, creature: NewCreature) -> StoreResult<Creature> {
        let mut state = self.state();
        state.check(FailPoint::Create)?;
        let creature = Creature::from_new(creature);
        state.creatures.insert(creature.id, creature.clone());
        Ok(creature)
    }

    fn delete(&self, id: CreatureId) -> StoreResult<()> {
        let mut state = self.state();
        state.check(FailPoint::Delete)?;
        state
            .creatures
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("creature {id}")))
    }

    fn find(&self, id: CreatureId) -> StoreResult<Option<Creature>> {
        Ok(self.state().creatures.get(&id).cloned())
    }

    fn count_by_owner(&self, player: PlayerId) -> StoreResult<usize> {
        Ok(self
            .state()
            .creatures
            .values()
            .filter(|c| c.owner == player)
            .count())
    }

    fn replace(&self, consumed: &[CreatureId], creature: NewCreature) -> StoreResult<Creature> {
        let mut state = self.state();
        state.check(FailPoint::Create)?;
        state.check(FailPoint::Delete)?;
        if let Some(missing) = consumed.iter().find(|id| !state.creatures.contains_key(*id)) {
            return Err(StoreError::NotFound(format!("creature {missing}")));
        }
        for id in consumed {
            state.creatures.remove(id);
        }
        let creature = Creature::from_new(creature);
        state.creatures.insert(creature.id, creature.clone());
        Ok(creature)
    }
}

impl CodexStore for MemoryStore {
    fn add_discovery_entry(&self, player: PlayerId, species: SpeciesId) -> StoreResult<()> {
        let mut state = self.state();
        state.check(FailPoint::DiscoveryEntry)?;
        state.discovered.entry(player).or_default().insert(species);
        Ok(())
    }

    fn collection_score(&self, player: PlayerId) -> StoreResult<u32> {
        let mut state = self.state();
        state.check(FailPoint::CollectionScore)?;
        let discovered = state
            .discovered
            .get(&player)
            .map(|set| set.iter().copied().collect::<Vec<_>>())
            .unwrap_or_default();
        let claims = state
            .first_claims
            .iter()
            .filter(|(owner, _)| *owner == player)
            .count();
        Ok(collection_score(
            &self.catalog,
            discovered,
            claims,
            &self.weights,
        ))
    }

    fn try_register_first_discovery(
        &self,
        player: PlayerId,
        species: SpeciesId,
    ) -> StoreResult<bool> {
        Ok(self.state().first_claims.insert((player, species)))
    }
}

impl ActivityLock for MemoryStore {
    fn is_creature_busy(&self, _player: PlayerId, creatures: &[CreatureId]) -> StoreResult<bool> {
        let state = self.state();
        Ok(creatures.iter().any(|id| state.busy.contains(id)))
    }
}

impl BuffStore for MemoryStore {
    fn is_luck_active(&self, player: PlayerId) -> StoreResult<bool> {
        Ok(self.state().lucky.contains(&player))
    }
}

impl PityStore for MemoryStore {
    fn increment(&self, player: PlayerId, pool: &str) -> StoreResult<u32> {
        let mut state = self.state();
        state.check(FailPoint::PityIncrement)?;
        let count = state.pity.entry((player, pool.to_string())).or_insert(0);
        *count = count.saturating_add(1);
        Ok(*count)
    }

    fn reset(&self, player: PlayerId, pool: &str) -> StoreResult<()> {
        let mut state = self.state();
        state.check(FailPoint::PityReset)?;
        state.pity.insert((player, pool.to_string()), 0);
        Ok(())
    }

    fn decrement(&self, player: PlayerId, pool: &str) -> StoreResult<()> {
        let mut state = self.state();
        if let Some(count) = state.pity.get_mut(&(player, pool.to_string())) {
            *count = count.saturating_sub(1);
        }
        Ok(())
    }

    fn count(&self, player: PlayerId, pool: &str) -> StoreResult<u32> {
        Ok(self
            .state()
            .pity
            .get(&(player, pool.to_string()))
            .copied()
            .unwrap_or(0))
    }
}

impl MissionTracker for MemoryStore {
    fn record(&self, player: PlayerId, mission: Mission, amount: u32) -> StoreResult<()> {
        let mut state = self.state();
        let progress = state.missions.entry((player, mission)).or_insert(0);
        *progress = progress.saturating_add(amount);
        Ok(())
    }
}
