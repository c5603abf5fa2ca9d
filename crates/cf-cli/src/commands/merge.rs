use std::path::Path;

use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;

use cf_core::{MaterialId, NewCreature, Personality, PlayerId, SpeciesId};
use cf_engine::{EngineConfig, SynthesisRequest};

pub fn run(
    catalog: Option<&Path>,
    first: u32,
    second: u32,
    material: Option<u32>,
    seed: u64,
) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;
    let (engine, store) = super::sandbox(catalog, EngineConfig::default());
    let player = PlayerId::new();

    let mut inputs = Vec::with_capacity(2);
    for id in [first, second] {
        let species = engine
            .catalog()
            .species(SpeciesId(id))
            .ok_or_else(|| format!("unknown species #{id}"))?;
        inputs.push(store.insert_creature(NewCreature::hatchling(
            player,
            species.id,
            species.element,
            Personality::Gentle,
        )));
    }

    let mut request = SynthesisRequest::new(player, inputs[0].id, inputs[1].id);
    if let Some(id) = material {
        store.grant_material(player, MaterialId(id), 1);
        request = request.with_material(MaterialId(id));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let outcome = engine
        .synthesize(&request, &mut rng)
        .map_err(|e| format!("{e} [{}]", e.code()))?;

    let species = engine
        .catalog()
        .species(outcome.creature.species)
        .ok_or_else(|| format!("unknown species {}", outcome.creature.species))?;

    println!(
        "  {} {} ({}, {}) via {}",
        "Result".bold(),
        species.name,
        species.element,
        super::paint_grade(species.grade),
        outcome.merge_type
    );
    if outcome.boosted {
        println!("  {}", "Grade boost skipped a grade".cyan());
    }
    if outcome.is_mutation {
        println!("  {}", "MUTATION".magenta().bold());
    }
    if outcome.is_great_success {
        println!(
            "  {} level {}, affection {}",
            "GREAT SUCCESS".yellow().bold(),
            outcome.creature.level,
            outcome.creature.care.affection
        );
    }
    if outcome.new_discovery {
        println!("  {}", "New species discovered".green());
    }

    Ok(())
}
