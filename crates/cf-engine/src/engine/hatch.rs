//! Egg hatching: pay once, then draw one creature per egg.

use chrono::Utc;
use rand::rngs::StdRng;

use cf_core::{Creature, Grade, NewCreature, Personality, PlayerId};

use super::Engine;
use crate::analytics::AnalyticsEvent;
use crate::error::{EngineError, EngineResult};
use crate::ports::{Cost, Mission};
use crate::sampler::{PoolConfig, sample_grade};

/// A request to open eggs from one pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HatchRequest {
    /// Who is hatching.
    pub player: PlayerId,
    /// Pool key.
    pub pool: String,
    /// Number of eggs.
    pub quantity: u32,
}

impl HatchRequest {
    /// A single egg from `pool`.
    pub fn new(player: PlayerId, pool: impl Into<String>) -> Self {
        Self {
            player,
            pool: pool.into(),
            quantity: 1,
        }
    }

    /// Open `quantity` eggs instead of one.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// One draw of a hatch.
#[derive(Debug, Clone, PartialEq)]
pub struct HatchedCreature {
    /// The persisted creature.
    pub creature: Creature,
    /// Grade of the awarded species.
    pub grade: Grade,
    /// Grade the sampler produced before pity.
    pub natural_grade: Grade,
    /// Whether pity raised the grade.
    pub forced: bool,
    /// First time this player saw the species.
    pub new_discovery: bool,
    /// Pity counter after this draw (0 if it reset).
    pub pity_count_after: u32,
}

/// Result of a successful hatch.
#[derive(Debug, Clone, PartialEq)]
pub struct HatchOutcome {
    /// Draws in order.
    pub draws: Vec<HatchedCreature>,
    /// Whether the lucky table was in effect.
    pub luck_active: bool,
    /// Total price charged.
    pub spent: Cost,
}

impl HatchOutcome {
    /// The hatched creatures in draw order.
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.draws.iter().map(|d| &d.creature)
    }
}

impl Engine {
    /// Open `request.quantity` eggs from `request.pool`.
    ///
    /// The full price is charged up front. Draws run one after another; if
    /// a draw fails, the price of every egg not yet opened is refunded and
    /// the error returned. Creatures hatched before the failure stay with
    /// the player.
    pub fn hatch(&self, request: &HatchRequest, rng: &mut StdRng) -> EngineResult<HatchOutcome> {
        let pool = self
            .pools
            .get(&request.pool)
            .ok_or_else(|| EngineError::UnknownPool(request.pool.clone()))?;
        let max = self.config.max_batch;
        if request.quantity == 0 || request.quantity > max {
            return Err(EngineError::InvalidQuantity {
                requested: request.quantity,
                max,
            });
        }

        let player = request.player;
        let luck_active = self.services.buffs.is_luck_active(player)?;
        let price = pool.price.times(request.quantity);
        if !self.services.ledger.spend_currency(player, price)? {
            return Err(EngineError::InsufficientCurrency);
        }

        let mut draws = Vec::with_capacity(request.quantity as usize);
        for index in 0..request.quantity {
            match self.draw_one(player, pool, luck_active, rng) {
                Ok(draw) => draws.push(draw),
                Err(err) => {
                    self.refund_unopened(player, pool, request.quantity - index);
                    return Err(err);
                }
            }
        }

        self.record_mission(player, Mission::Hatch, request.quantity);
        tracing::info!(
            %player,
            pool = %pool.key,
            quantity = request.quantity,
            luck_active,
            "hatch complete"
        );

        Ok(HatchOutcome {
            draws,
            luck_active,
            spent: price,
        })
    }

    fn draw_one(
        &self,
        player: PlayerId,
        pool: &PoolConfig,
        luck_active: bool,
        rng: &mut StdRng,
    ) -> EngineResult<HatchedCreature> {
        let count = self.services.pity.increment(player, &pool.key)?;
        let natural_grade = sample_grade(pool, luck_active, rng);
        let decision = self.config.pity.apply(natural_grade, count);
        let species = pool.resolve_species(&self.catalog, decision.grade, rng);
        let personality = Personality::random(rng);

        let creature = match self.services.creatures.create(NewCreature::hatchling(
            player,
            species.id,
            species.element,
            personality,
        )) {
            Ok(creature) => creature,
            Err(err) => {
                if let Err(undo) = self.services.pity.decrement(player, &pool.key) {
                    tracing::warn!(%player, pool = %pool.key, error = %undo, "failed to undo pity increment");
                }
                return Err(err.into());
            }
        };
        let new_discovery = self.record_discovery(player, species.id);

        let mut pity_count_after = count;
        if self.config.pity.qualifies_for_reset(species.grade) {
            match self.services.pity.reset(player, &pool.key) {
                Ok(()) => pity_count_after = 0,
                Err(err) => {
                    tracing::warn!(%player, pool = %pool.key, error = %err, "failed to reset pity counter");
                }
            }
        }

        tracing::debug!(
            %player,
            pool = %pool.key,
            species = %species.id,
            grade = %species.grade,
            natural = %natural_grade,
            forced = decision.forced,
            pity = count,
            "egg hatched"
        );

        self.services.analytics.record(AnalyticsEvent::Hatched {
            player,
            pool: pool.key.clone(),
            species: species.id,
            grade: species.grade,
            natural_grade,
            forced: decision.forced,
            pity_count: count,
            timestamp: Utc::now(),
        });

        Ok(HatchedCreature {
            creature,
            grade: species.grade,
            natural_grade,
            forced: decision.forced,
            new_discovery,
            pity_count_after,
        })
    }

    fn refund_unopened(&self, player: PlayerId, pool: &PoolConfig, unopened: u32) {
        let refund = pool.price.times(unopened);
        if refund.is_zero() {
            return;
        }
        if let Err(err) = self.services.ledger.add_currency(player, refund) {
            tracing::error!(
                %player,
                pool = %pool.key,
                %refund,
                error = %err,
                "refund for unopened eggs failed; manual reconciliation required"
            );
        }
    }
}
