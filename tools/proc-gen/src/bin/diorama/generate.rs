//! Generate command - build props and write OBJ + provenance files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use diorama_core::{Provenance, ResolvedParams};
use proc_gen::registry::GeneratorRegistry;
use tracing::warn;

use crate::engine::{open_engine, write_artifact, write_state};

#[derive(Args)]
pub struct GenerateArgs {
    /// Generator name (see `diorama list`)
    pub generator: String,

    /// Seed: an integer, or any text to hash
    #[arg(short, long)]
    pub seed: Option<String>,

    /// Number of props to build
    #[arg(short, long, default_value_t = 1)]
    pub count: usize,

    /// Build from a provenance or params JSON file instead of random params
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Continue from a saved engine state (`.json` or binary)
    #[arg(long)]
    pub state_in: Option<PathBuf>,

    /// Save the engine state after generating
    #[arg(long)]
    pub state_out: Option<PathBuf>,
}

/// Params from either a full provenance record or a bare params map
fn load_params(path: &Path, generator: &str) -> Result<ResolvedParams> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read params: {}", path.display()))?;

    let provenance_err = match serde_json::from_str::<Provenance>(&text) {
        Ok(provenance) => {
            if provenance.generator != generator {
                warn!(
                    "{} was made by `{}`, building with `{}`",
                    path.display(),
                    provenance.generator,
                    generator
                );
            }
            return Ok(provenance.params);
        }
        Err(err) => err,
    };

    serde_json::from_str(&text).map_err(|params_err| {
        anyhow::anyhow!(
            "Invalid params file {}: not a provenance record ({provenance_err}) nor a params map ({params_err})",
            path.display()
        )
    })
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let registry = GeneratorRegistry::with_builtin();
    let generator = registry.require(&args.generator)?;
    let mut rng = open_engine(args.seed.as_deref(), args.state_in.as_deref())?;

    let fixed_params = args
        .params
        .as_deref()
        .map(|path| load_params(path, generator.name()))
        .transpose()?;

    println!("Generating {} x {}...", args.count, generator.name());

    for i in 1..=args.count {
        let artifact = match &fixed_params {
            Some(params) => generator.make_mesh(params, &mut rng),
            None => generator.make_random_mesh(&mut rng),
        }
        .with_context(|| format!("Failed to build {} #{i}", generator.name()))?;

        let stem = format!("{}_{i}", generator.name());
        let path = write_artifact(&artifact, &args.out, &stem)?;
        println!(
            "  {} ({} vertices, {} triangles)",
            path.display(),
            artifact.mesh.vertex_count(),
            artifact.mesh.triangle_count()
        );
    }

    if let Some(path) = &args.state_out {
        write_state(&rng, path)?;
    }

    Ok(())
}
