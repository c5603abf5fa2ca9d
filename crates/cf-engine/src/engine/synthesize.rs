//! Synthesis: validate, reserve the material, resolve, then commit or roll back.

use chrono::Utc;
use rand::rngs::StdRng;

use cf_core::{
    Creature, CreatureId, ForcedOutcome, MaterialEffect, MaterialId, NewCreature, Personality,
    PlayerId, Species, apply_experience,
};

use super::Engine;
use crate::analytics::AnalyticsEvent;
use crate::error::{EngineError, EngineResult};
use crate::ports::Mission;
use crate::synthesis::{MergeType, mutate, resolve_merge, roll_percent};

/// A request to merge two owned creatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    /// Who is merging.
    pub player: PlayerId,
    /// First input creature.
    pub first: CreatureId,
    /// Second input creature.
    pub second: CreatureId,
    /// Optional material to consume.
    pub material: Option<MaterialId>,
}

impl SynthesisRequest {
    /// Merge without a material.
    pub fn new(player: PlayerId, first: CreatureId, second: CreatureId) -> Self {
        Self {
            player,
            first,
            second,
            material: None,
        }
    }

    /// Consume one unit of `material`.
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }
}

/// Result of a committed synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutcome {
    /// The new creature.
    pub creature: Creature,
    /// Path the base outcome took.
    pub merge_type: MergeType,
    /// Whether a material's grade boost skipped a grade.
    pub boosted: bool,
    /// Whether mutation replaced the base outcome.
    pub is_mutation: bool,
    /// Whether the great-success bonus was granted.
    pub is_great_success: bool,
    /// First time this player saw the resulting species.
    pub new_discovery: bool,
}

/// Validated inputs, loaded before anything is reserved.
struct Inputs<'c> {
    first: Creature,
    second: Creature,
    first_species: &'c Species,
    second_species: &'c Species,
    effect: Option<&'c MaterialEffect>,
}

/// What the resolve step decided, before the commit.
struct Resolved {
    creature: NewCreature,
    merge_type: MergeType,
    boosted: bool,
    is_mutation: bool,
    is_great_success: bool,
}

impl Engine {
    /// Merge two creatures into one.
    ///
    /// Validation failures have no side effects. Once the material is
    /// reserved, any failure before the commit refunds exactly one unit.
    pub fn synthesize(
        &self,
        request: &SynthesisRequest,
        rng: &mut StdRng,
    ) -> EngineResult<SynthesisOutcome> {
        let inputs = self.validate(request)?;
        let player = request.player;

        if let Some(material) = request.material {
            if !self.services.ledger.consume_material(player, material, 1)? {
                return Err(EngineError::InsufficientMaterial(material));
            }
        }

        let result = self
            .resolve(request, &inputs, rng)
            .and_then(|resolved| {
                let creature = self
                    .services
                    .creatures
                    .replace(&[inputs.first.id, inputs.second.id], resolved.creature.clone())?;
                Ok((creature, resolved))
            });
        let (creature, resolved) = match result {
            Ok(committed) => committed,
            Err(err) => {
                self.roll_back(request, &err);
                return Err(err);
            }
        };

        let new_discovery = self.record_discovery(player, creature.species);
        self.services.analytics.record(AnalyticsEvent::Synthesized {
            player,
            inputs: [inputs.first.species, inputs.second.species],
            material: request.material,
            merge_type: resolved.merge_type,
            result: creature.species,
            is_mutation: resolved.is_mutation,
            is_great_success: resolved.is_great_success,
            timestamp: Utc::now(),
        });
        self.record_mission(player, Mission::Synthesis, 1);

        tracing::info!(
            %player,
            result = %creature.species,
            merge_type = %resolved.merge_type,
            mutation = resolved.is_mutation,
            great_success = resolved.is_great_success,
            "synthesis complete"
        );

        Ok(SynthesisOutcome {
            creature,
            merge_type: resolved.merge_type,
            boosted: resolved.boosted,
            is_mutation: resolved.is_mutation,
            is_great_success: resolved.is_great_success,
            new_discovery,
        })
    }

    fn validate(&self, request: &SynthesisRequest) -> EngineResult<Inputs<'_>> {
        if request.first == request.second {
            return Err(EngineError::IdenticalCreatures);
        }

        let first = self.load_owned(request.player, request.first)?;
        let second = self.load_owned(request.player, request.second)?;

        if self
            .services
            .activity
            .is_creature_busy(request.player, &[first.id, second.id])?
        {
            return Err(EngineError::CreatureBusy);
        }

        let effect = match request.material {
            Some(id) => Some(
                &self
                    .catalog
                    .material(id)
                    .ok_or(EngineError::UnknownMaterial(id))?
                    .effect,
            ),
            None => None,
        };

        let first_species = self
            .catalog
            .species(first.species)
            .ok_or(EngineError::UnknownSpecies(first.species))?;
        let second_species = self
            .catalog
            .species(second.species)
            .ok_or(EngineError::UnknownSpecies(second.species))?;

        Ok(Inputs {
            first,
            second,
            first_species,
            second_species,
            effect,
        })
    }

    fn load_owned(&self, player: PlayerId, id: CreatureId) -> EngineResult<Creature> {
        let creature = self
            .services
            .creatures
            .find(id)?
            .ok_or(EngineError::CreatureNotFound(id))?;
        if creature.owner != player {
            return Err(EngineError::NotOwner(id));
        }
        Ok(creature)
    }

    fn resolve(
        &self,
        request: &SynthesisRequest,
        inputs: &Inputs<'_>,
        rng: &mut StdRng,
    ) -> EngineResult<Resolved> {
        let plan = resolve_merge(
            &self.catalog,
            inputs.first_species,
            inputs.second_species,
            inputs.effect,
            rng,
        )?;
        let score = self.services.codex.collection_score(request.player)?;
        let force = inputs.effect.and_then(|e| e.force);

        let mutation_hit = force == Some(ForcedOutcome::Mutation)
            || roll_percent(self.config.odds.mutation_chance(score, inputs.effect), rng);
        let great_success = force == Some(ForcedOutcome::GreatSuccess)
            || roll_percent(self.config.odds.great_success_chance(score), rng);

        let mut species = plan.species;
        let mut is_mutation = false;
        if mutation_hit {
            if let Some(mutated) = mutate(&self.catalog, plan.species, rng) {
                species = mutated;
                is_mutation = true;
            }
        }

        let mut creature = NewCreature::hatchling(
            request.player,
            species.id,
            species.element,
            Personality::random(rng),
        );
        if great_success {
            let progress = apply_experience(
                creature.level,
                creature.experience,
                self.config.great_success_experience,
            );
            creature.level = progress.level;
            creature.experience = progress.experience;
            creature.care = creature
                .care
                .with_affection_bonus(self.config.great_success_affection);
        }

        tracing::debug!(
            player = %request.player,
            base = %plan.species.id,
            result = %species.id,
            score,
            mutation = is_mutation,
            great_success,
            "synthesis resolved"
        );

        Ok(Resolved {
            creature,
            merge_type: plan.merge_type,
            boosted: plan.boosted,
            is_mutation,
            is_great_success: great_success,
        })
    }

    fn roll_back(&self, request: &SynthesisRequest, err: &EngineError) {
        let Some(material) = request.material else {
            return;
        };
        let player = request.player;
        let refunded = match self.services.ledger.add_material(player, material, 1) {
            Ok(()) => true,
            Err(refund_err) => {
                tracing::error!(
                    %player,
                    %material,
                    cause = %err,
                    error = %refund_err,
                    "material refund failed; manual reconciliation required"
                );
                false
            }
        };
        tracing::warn!(%player, %material, code = err.code(), "synthesis rolled back");
        self.services
            .analytics
            .record(AnalyticsEvent::SynthesisRolledBack {
                player,
                material: Some(material),
                reason: err.code().to_string(),
                refunded,
                timestamp: Utc::now(),
            });
    }
}
