use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use cf_core::{Element, ForcedOutcome, Grade};

pub fn run(
    path: Option<&Path>,
    grade: Option<&str>,
    element: Option<&str>,
    materials: bool,
) -> Result<(), String> {
    let catalog = super::load_catalog(path)?;

    if materials {
        if catalog.materials().is_empty() {
            println!("  No materials defined.");
            return Ok(());
        }
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["ID", "Name", "Mutation +%", "Grade boost %", "Forces"]);
        for mat in catalog.materials() {
            let forces = match mat.effect.force {
                Some(ForcedOutcome::Mutation) => "mutation",
                Some(ForcedOutcome::GreatSuccess) => "great success",
                None => "-",
            };
            table.add_row(vec![
                mat.id.to_string(),
                mat.name.clone(),
                format!("{:.1}", mat.effect.mutation_bonus),
                format!("{:.1}", mat.effect.grade_boost),
                forces.to_string(),
            ]);
        }
        println!("{table}");
        println!();
        println!("  {} materials", catalog.materials().len());
        return Ok(());
    }

    let grade = grade
        .map(|g| Grade::parse(g).ok_or_else(|| format!("unknown grade '{g}'")))
        .transpose()?;
    let element = element
        .map(|e| Element::parse(e).ok_or_else(|| format!("unknown element '{e}'")))
        .transpose()?;

    let species: Vec<_> = catalog
        .all_species()
        .iter()
        .filter(|sp| grade.is_none_or(|g| sp.grade == g))
        .filter(|sp| element.is_none_or(|e| sp.element == e))
        .collect();

    if species.is_empty() {
        println!("  No species found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Element", "Grade"]);
    for sp in &species {
        table.add_row(vec![
            sp.id.to_string(),
            sp.name.clone(),
            sp.element.to_string(),
            super::paint_grade(sp.grade).to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} species, {} recipes, {} materials",
        species.len(),
        catalog.recipe_count(),
        catalog.materials().len()
    );

    Ok(())
}
