//! `info` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let json = config_loader::ConfigLoader::to_json(&blueprint)
            .context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn print_config_info(blueprint: &contracts::ReplayBlueprint) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Legged Replay Configuration                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📄 Input");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   └─ Log: {}", blueprint.input.path.display());

    let dispatch = &blueprint.dispatch;
    println!("\n⚙️  Dispatch");
    println!(
        "   ├─ Mode: {}",
        if dispatch.strict { "strict" } else { "lenient" }
    );
    println!("   ├─ dt_min: {} s", dispatch.gate.dt_min);
    println!("   └─ dt_max: {} s", dispatch.gate.dt_max);

    println!("\n🔊 Noise (std dev)");
    let noise = blueprint.noise.named();
    for (i, (name, value)) in noise.iter().enumerate() {
        let prefix = if i == noise.len() - 1 { "└─" } else { "├─" };
        println!("   {} {}: {}", prefix, name, value);
    }

    println!("\n🧭 Initial State");
    println!("{}", blueprint.initial_robot_state());
    println!();
}
