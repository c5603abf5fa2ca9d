use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;

use cf_core::PlayerId;
use cf_engine::{EngineConfig, HatchRequest};

pub fn run(
    catalog: Option<&Path>,
    pool_key: &str,
    count: u32,
    seed: u64,
    pity: u32,
) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;
    let (engine, store) = super::sandbox(catalog, EngineConfig::default());
    let pool = engine
        .pools()
        .get(pool_key)
        .ok_or_else(|| format!("unknown pool '{pool_key}'"))?;

    let player = PlayerId::new();
    store.grant_currency(player, pool.price.times(count));
    store.set_pity(player, pool_key, pity);

    let mut rng = StdRng::seed_from_u64(seed);
    let request = HatchRequest::new(player, pool_key).with_quantity(count);
    let outcome = engine.hatch(&request, &mut rng).map_err(|e| e.to_string())?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Species", "Element", "Grade", "Personality", "Pity"]);
    for (i, draw) in outcome.draws.iter().enumerate() {
        let name = engine
            .catalog()
            .species(draw.creature.species)
            .map(|sp| sp.name.clone())
            .unwrap_or_else(|| draw.creature.species.to_string());
        let mut grade = super::paint_grade(draw.grade).to_string();
        if draw.forced {
            grade.push_str(" (pity)");
        }
        let name = if draw.new_discovery {
            format!("{name} {}", "NEW".green().bold())
        } else {
            name
        };
        table.add_row(vec![
            (i + 1).to_string(),
            name,
            draw.creature.element.to_string(),
            grade,
            draw.creature.personality.to_string(),
            draw.pity_count_after.to_string(),
        ]);
    }

    println!(
        "  {} {} from '{}' {}",
        "Hatched".bold(),
        outcome.draws.len(),
        pool_key,
        format!("(seed={seed}, spent {})", outcome.spent).dimmed()
    );
    println!();
    println!("{table}");

    Ok(())
}
