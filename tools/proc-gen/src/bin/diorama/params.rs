//! Params command - resolve one parameter set and print it as JSON

use anyhow::{Context, Result};
use clap::Args;
use diorama_core::resolve_schema_with_report;
use proc_gen::registry::GeneratorRegistry;

use crate::engine::open_engine;

#[derive(Args)]
pub struct ParamsArgs {
    /// Generator name (see `diorama list`)
    pub generator: String,

    /// Seed: an integer, or any text to hash
    #[arg(short, long)]
    pub seed: Option<String>,
}

pub fn execute(args: ParamsArgs) -> Result<()> {
    let registry = GeneratorRegistry::with_builtin();
    let generator = registry.require(&args.generator)?;
    let mut rng = open_engine(args.seed.as_deref(), None)?;

    let resolution = resolve_schema_with_report(generator.schema(), &mut rng);
    if !resolution.is_clean() {
        eprintln!(
            "{} parameter(s) of `{}` could not be resolved",
            resolution.errors.len(),
            generator.name()
        );
    }

    let json = serde_json::to_string_pretty(&resolution.params).context("Failed to serialize params")?;
    println!("{json}");
    Ok(())
}
