//! The request-facing engine.
//!
//! [`Engine`] owns the immutable catalog, the pool registry and the tuning
//! configuration, and reaches every mutable piece of state through the
//! ports in [`Services`]. Its methods take `&self` plus a caller supplied
//! RNG, so a single instance can serve concurrent requests.

mod hatch;
mod synthesize;

use std::sync::Arc;

use cf_core::{Catalog, PlayerId, SpeciesId};

use crate::config::EngineConfig;
use crate::ports::{
    ActivityLock, AnalyticsSink, BuffStore, CodexStore, CreatureRepository, Ledger, Mission,
    MissionTracker, PityStore,
};
use crate::sampler::PoolRegistry;

pub use hatch::{HatchOutcome, HatchRequest, HatchedCreature};
pub use synthesize::{SynthesisOutcome, SynthesisRequest};

/// The collaborators an [`Engine`] talks to.
#[derive(Clone)]
pub struct Services {
    /// Currency and material balances.
    pub ledger: Arc<dyn Ledger>,
    /// Creature persistence.
    pub creatures: Arc<dyn CreatureRepository>,
    /// Discovery codex.
    pub codex: Arc<dyn CodexStore>,
    /// Exploration and training locks.
    pub activity: Arc<dyn ActivityLock>,
    /// Player buffs.
    pub buffs: Arc<dyn BuffStore>,
    /// Pity counters.
    pub pity: Arc<dyn PityStore>,
    /// Mission progress.
    pub missions: Arc<dyn MissionTracker>,
    /// Analytics events.
    pub analytics: Arc<dyn AnalyticsSink>,
}

impl Services {
    /// Use one store for every port except analytics.
    pub fn uniform<S>(store: Arc<S>, analytics: Arc<dyn AnalyticsSink>) -> Self
    where
        S: Ledger
            + CreatureRepository
            + CodexStore
            + ActivityLock
            + BuffStore
            + PityStore
            + MissionTracker
            + 'static,
    {
        Self {
            ledger: store.clone(),
            creatures: store.clone(),
            codex: store.clone(),
            activity: store.clone(),
            buffs: store.clone(),
            pity: store.clone(),
            missions: store,
            analytics,
        }
    }

    /// Swap in a different pity store.
    pub fn with_pity_store(mut self, pity: Arc<dyn PityStore>) -> Self {
        self.pity = pity;
        self
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

/// Creature acquisition and synthesis.
pub struct Engine {
    catalog: Arc<Catalog>,
    pools: PoolRegistry,
    config: EngineConfig,
    services: Services,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("species", &self.catalog.all_species().len())
            .field("pools", &self.pools.pools().len())
            .field("config", &self.config)
            .finish()
    }
}

impl Engine {
    /// Assemble an engine.
    pub fn new(
        catalog: Arc<Catalog>,
        pools: PoolRegistry,
        config: EngineConfig,
        services: Services,
    ) -> Self {
        Self {
            catalog,
            pools,
            config,
            services,
        }
    }

    /// The species catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The configured pools.
    pub fn pools(&self) -> &PoolRegistry {
        &self.pools
    }

    /// The tuning configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Record a sighting and claim the first-discovery reward if it is new.
    ///
    /// Best-effort: failures are logged and reported as "not new".
    fn record_discovery(&self, player: PlayerId, species: SpeciesId) -> bool {
        if let Err(err) = self.services.codex.add_discovery_entry(player, species) {
            tracing::warn!(%player, %species, error = %err, "failed to record discovery entry");
            return false;
        }

        match self
            .services
            .codex
            .try_register_first_discovery(player, species)
        {
            Ok(true) => {
                let reward = self.config.first_discovery_reward;
                if !reward.is_zero() {
                    if let Err(err) = self.services.ledger.add_currency(player, reward) {
                        tracing::warn!(%player, %species, error = %err, "failed to grant discovery reward");
                    }
                }
                self.record_mission(player, Mission::Discovery, 1);
                true
            }
            Ok(false) => false,
            Err(err) => {
                tracing::warn!(%player, %species, error = %err, "failed to register first discovery");
                false
            }
        }
    }

    fn record_mission(&self, player: PlayerId, mission: Mission, amount: u32) {
        if let Err(err) = self.services.missions.record(player, mission, amount) {
            tracing::warn!(%player, ?mission, error = %err, "failed to update mission progress");
        }
    }
}
