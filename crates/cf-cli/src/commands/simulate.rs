use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;

use cf_core::{Grade, PlayerId};
use cf_engine::{EngineConfig, HatchRequest};

pub fn run(
    catalog: Option<&Path>,
    pool_key: &str,
    draws: u32,
    seed: u64,
    lucky: bool,
    json: bool,
) -> Result<(), String> {
    if draws == 0 {
        return Err("number of draws must be at least 1".into());
    }

    let catalog = super::load_catalog(catalog)?;
    let config = EngineConfig::default();
    let batch = config.max_batch;
    let (engine, store) = super::sandbox(catalog, config);
    let pool = engine
        .pools()
        .get(pool_key)
        .ok_or_else(|| format!("unknown pool '{pool_key}'"))?
        .clone();

    let player = PlayerId::new();
    store.grant_currency(player, pool.price.times(draws));
    store.set_luck(player, lucky);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut counts: BTreeMap<Grade, u32> = Grade::ALL.iter().map(|g| (*g, 0)).collect();
    let mut forced = 0u32;
    let mut remaining = draws;
    while remaining > 0 {
        let quantity = remaining.min(batch);
        let request = HatchRequest::new(player, pool_key).with_quantity(quantity);
        let outcome = engine
            .hatch(&request, &mut rng)
            .map_err(|e| format!("simulation failed: {e}"))?;
        for draw in &outcome.draws {
            *counts.entry(draw.grade).or_default() += 1;
            if draw.forced {
                forced += 1;
            }
        }
        remaining -= quantity;
    }

    let table_for = pool.table_for(lucky);
    if json {
        let grades: serde_json::Map<String, serde_json::Value> = counts
            .iter()
            .map(|(g, n)| (g.to_string(), serde_json::Value::from(*n)))
            .collect();
        let doc = serde_json::json!({
            "pool": pool.key.clone(),
            "draws": draws,
            "seed": seed,
            "lucky": lucky,
            "forced": forced,
            "grades": grades,
        });
        let out = serde_json::to_string_pretty(&doc).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "  {} '{}' {}",
        "Simulation".bold(),
        pool.key,
        format!("({draws} draws, seed={seed}{})", if lucky { ", lucky" } else { "" }).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Grade", "Count", "Observed", "Configured"]);
    for (grade, count) in &counts {
        let observed = f64::from(*count) * 100.0 / f64::from(draws);
        table.add_row(vec![
            super::paint_grade(*grade).to_string(),
            count.to_string(),
            format!("{observed:.2}%"),
            format!("{:.2}%", table_for.weight(*grade)),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "  {} draws raised by pity, {} spent",
        forced,
        pool.price.times(draws)
    );

    Ok(())
}
