//! Operator CLI for the Critterforge acquisition and synthesis engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(
    name = "cf",
    about = "Critterforge: inspect the catalog, tune egg pools, simulate hatches and merges",
    version,
    propagate_version = true
)]
struct Cli {
    /// Catalog JSON to load instead of the built-in catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List species in the catalog
    Catalog {
        /// Only species of this grade
        #[arg(short, long)]
        grade: Option<String>,

        /// Only species of this element
        #[arg(short, long)]
        element: Option<String>,

        /// List synthesis materials instead of species
        #[arg(long)]
        materials: bool,
    },

    /// Show configured egg pools and their grade weights
    Pools,

    /// Estimate a pool's grade distribution by running many draws
    Simulate {
        /// Pool key (e.g. normal, premium, element:fire)
        #[arg(short, long, default_value = "normal")]
        pool: String,

        /// Number of eggs to open
        #[arg(short = 'n', long, default_value = "10000")]
        draws: u32,

        /// RNG seed for reproducible runs
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Simulate with the luck buff active
        #[arg(long)]
        lucky: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open eggs for a throwaway player and show what hatched
    Hatch {
        /// Pool key
        #[arg(short, long, default_value = "normal")]
        pool: String,

        /// Number of eggs (1-10)
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Starting pity counter for the pool
        #[arg(long, default_value = "0")]
        pity: u32,
    },

    /// Merge two creatures of the given species for a throwaway player
    Merge {
        /// Species id of the first creature
        first: u32,

        /// Species id of the second creature
        second: u32,

        /// Material id to consume
        #[arg(short, long)]
        material: Option<u32>,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = cli.catalog.as_deref();
    let result = match cli.command {
        Commands::Catalog {
            grade,
            element,
            materials,
        } => commands::catalog::run(catalog, grade.as_deref(), element.as_deref(), materials),
        Commands::Pools => commands::pools::run(),
        Commands::Simulate {
            pool,
            draws,
            seed,
            lucky,
            json,
        } => commands::simulate::run(catalog, &pool, draws, seed, lucky, json),
        Commands::Hatch {
            pool,
            count,
            seed,
            pity,
        } => commands::hatch::run(catalog, &pool, count, seed, pity),
        Commands::Merge {
            first,
            second,
            material,
            seed,
        } => commands::merge::run(catalog, first, second, material, seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
