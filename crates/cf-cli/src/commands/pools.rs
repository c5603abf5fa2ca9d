use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use cf_core::Grade;
use cf_engine::PoolRegistry;

pub fn run() -> Result<(), String> {
    let registry = PoolRegistry::builtin();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec!["Pool".to_string(), "Price".to_string()];
    header.extend(Grade::ALL.iter().map(|g| g.to_string()));
    header.push("Lucky table".to_string());
    table.set_header(header);

    for pool in registry.pools() {
        let mut row = vec![pool.key.clone(), pool.price.to_string()];
        row.extend(
            Grade::ALL
                .iter()
                .map(|g| format_weight(pool.table.weight(*g))),
        );
        row.push(if pool.lucky_table.is_some() {
            "yes".to_string()
        } else {
            "-".to_string()
        });
        table.add_row(row);
    }

    println!("  {}", "Egg Pools".bold().underline());
    println!();
    println!("{table}");
    println!();
    println!("  {} pools", registry.pools().len());

    Ok(())
}

fn format_weight(weight: f64) -> String {
    if weight <= 0.0 {
        "-".to_string()
    } else {
        format!("{weight:.1}%")
    }
}
