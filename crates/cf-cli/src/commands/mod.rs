pub mod catalog;
pub mod hatch;
pub mod merge;
pub mod pools;
pub mod simulate;

use std::path::Path;
use std::sync::Arc;

use colored::{ColoredString, Colorize};

use cf_core::{Catalog, Grade};
use cf_engine::{Engine, EngineConfig, MemoryStore, NullSink, PoolRegistry, Services};

/// Load the catalog from `path`, or the built-in one.
fn load_catalog(path: Option<&Path>) -> Result<Arc<Catalog>, String> {
    let catalog = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            Catalog::from_json(&json).map_err(|e| format!("invalid catalog: {e}"))?
        }
        None => Catalog::builtin().map_err(|e| format!("built-in catalog is invalid: {e}"))?,
    };
    Ok(Arc::new(catalog))
}

/// An engine over an empty in-memory store, for demos and simulations.
fn sandbox(catalog: Arc<Catalog>, config: EngineConfig) -> (Engine, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(catalog.clone()));
    let services = Services::uniform(store.clone(), Arc::new(NullSink));
    let engine = Engine::new(catalog, PoolRegistry::builtin(), config, services);
    (engine, store)
}

fn paint_grade(grade: Grade) -> ColoredString {
    let label = grade.to_string();
    match grade {
        Grade::Common => label.normal(),
        Grade::Uncommon => label.green(),
        Grade::Rare => label.blue(),
        Grade::Epic => label.magenta(),
        Grade::Legendary => label.yellow().bold(),
        Grade::Mythic => label.red().bold(),
    }
}
