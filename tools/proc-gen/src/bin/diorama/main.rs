//! Diorama CLI - generate low-poly props from the command line
//!
//! # Commands
//!
//! - `diorama list` - Show generators and their editable fields
//! - `diorama params` - Print one resolved parameter set as JSON
//! - `diorama generate` - Build props and write OBJ + provenance files
//! - `diorama scatter` - Spawn props from a weighted table
//!
//! # Usage
//!
//! ```bash
//! # Three conifers from a fixed seed
//! diorama generate conifer --seed forest --count 3 --out props/
//!
//! # Rebuild one of them from its provenance
//! diorama generate conifer --params props/conifer_1.json --out rebuilt/
//!
//! # Ground cover from the built-in tables
//! diorama scatter --table ground --count 20 --seed meadow
//! ```
//!
//! Set `RUST_LOG=debug` to see reseeding and skipped spawns.

mod engine;
mod generate;
mod list;
mod params;
mod scatter;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Diorama CLI - low-poly prop generator
#[derive(Parser)]
#[command(name = "diorama")]
#[command(about = "Procedural low-poly props with reproducible seeds")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List generators and their editable fields
    List(list::ListArgs),

    /// Print one resolved parameter set as JSON
    Params(params::ParamsArgs),

    /// Build props and write OBJ + provenance files
    Generate(generate::GenerateArgs),

    /// Spawn props from a weighted scatter table
    Scatter(scatter::ScatterArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List(args) => list::execute(args),
        Commands::Params(args) => params::execute(args),
        Commands::Generate(args) => generate::execute(args),
        Commands::Scatter(args) => scatter::execute(args),
    }
}
