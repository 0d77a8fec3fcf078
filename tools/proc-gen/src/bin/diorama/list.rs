//! List command - show generators and their editable fields

use anyhow::Result;
use clap::Args;
use proc_gen::registry::GeneratorRegistry;

#[derive(Args)]
pub struct ListArgs {
    /// Only print generator names
    #[arg(short, long)]
    pub names: bool,
}

pub fn execute(args: ListArgs) -> Result<()> {
    let registry = GeneratorRegistry::with_builtin();

    for generator in registry.iter() {
        println!("{}", generator.name());
        if args.names {
            continue;
        }
        for (name, spec) in generator.editable_fields() {
            println!("  {:<22} {}", name, spec.kind);
        }
    }

    Ok(())
}
