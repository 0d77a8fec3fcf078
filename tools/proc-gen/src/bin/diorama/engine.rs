//! Engine setup and output files shared by the commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use diorama_core::{GeneratedArtifact, RandomEngine, RandomEngineState, Seed};
use proc_gen::mesh::{UnpackedMesh, write_obj};
use tracing::info;

/// Engine from `--state-in`, else `--seed`, else OS entropy
pub fn open_engine(seed: Option<&str>, state_in: Option<&Path>) -> Result<RandomEngine> {
    if let Some(path) = state_in {
        let state = read_state(path)?;
        if seed.is_some() {
            info!("--state-in given, ignoring --seed");
        }
        return Ok(RandomEngine::from_state(state));
    }

    Ok(match seed {
        Some(text) => RandomEngine::new(Seed::parse(text)),
        None => RandomEngine::unseeded(),
    })
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// `.json` files hold the JSON form, anything else the binary form
pub fn read_state(path: &Path) -> Result<RandomEngineState> {
    let state = if is_json(path) {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine state: {}", path.display()))?;
        RandomEngineState::from_json(&text)
    } else {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read engine state: {}", path.display()))?;
        RandomEngineState::from_bytes(&bytes)
    };
    state.with_context(|| format!("Invalid engine state: {}", path.display()))
}

pub fn write_state(engine: &RandomEngine, path: &Path) -> Result<()> {
    let state = engine.export_state();
    let written = if is_json(path) {
        std::fs::write(path, state.to_json()?)
    } else {
        std::fs::write(path, state.to_bytes()?)
    };
    written.with_context(|| format!("Failed to write engine state: {}", path.display()))?;

    println!("Saved engine state ({} draws) to {}", state.draws(), path.display());
    Ok(())
}

/// Write `<stem>.obj` and `<stem>.json` into `out`, returning the OBJ path
pub fn write_artifact(artifact: &GeneratedArtifact<UnpackedMesh>, out: &Path, stem: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;

    let obj_path = out.join(format!("{stem}.obj"));
    write_obj(&artifact.mesh, &obj_path, stem)
        .with_context(|| format!("Failed to write mesh: {}", obj_path.display()))?;

    let json_path = out.join(format!("{stem}.json"));
    let provenance =
        serde_json::to_string_pretty(&artifact.provenance).context("Failed to serialize provenance")?;
    std::fs::write(&json_path, provenance)
        .with_context(|| format!("Failed to write provenance: {}", json_path.display()))?;

    Ok(obj_path)
}
