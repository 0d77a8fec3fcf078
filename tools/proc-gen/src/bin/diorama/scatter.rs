//! Scatter command - spawn props from a weighted table

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use diorama_core::RandomEngine;
use proc_gen::config::ScatterConfig;
use proc_gen::registry::GeneratorRegistry;

use crate::engine::{open_engine, write_artifact, write_state};

#[derive(Args)]
pub struct ScatterArgs {
    /// Scatter config (TOML). Defaults to the built-in tables
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Table to spawn from
    #[arg(short, long)]
    pub table: String,

    /// Number of spawns
    #[arg(short = 'n', long, default_value_t = 10)]
    pub count: usize,

    /// Seed, overriding the config's scene seed
    #[arg(short, long)]
    pub seed: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Save the engine state after spawning
    #[arg(long)]
    pub state_out: Option<PathBuf>,
}

pub fn execute(args: ScatterArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ScatterConfig::load(path)?,
        None => ScatterConfig::default(),
    };

    let registry = GeneratorRegistry::with_builtin();
    let table = config.spawn_table(&args.table, &registry)?;

    let mut rng = match (&args.seed, &config.seed) {
        (Some(seed), _) => open_engine(Some(seed), None)?,
        (None, Some(seed)) => RandomEngine::new(seed.clone()),
        (None, None) => open_engine(None, None)?,
    };

    let artifacts = table.spawn(args.count, &mut rng);
    println!(
        "Spawned {} of {} from `{}`",
        artifacts.len(),
        args.count,
        args.table
    );

    for (i, artifact) in artifacts.iter().enumerate() {
        let stem = format!("{}_{}", artifact.provenance.generator, i + 1);
        let path = write_artifact(artifact, &args.out, &stem)?;
        println!("  {}", path.display());
    }

    if let Some(path) = &args.state_out {
        write_state(&rng, path)?;
    }

    Ok(())
}
