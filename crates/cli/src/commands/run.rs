//! `run` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use tracing::info;

use crate::cli::RunArgs;
use crate::pipeline::{Replay, ReplayConfig};

/// Execute the `run` command
pub fn run_replay(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut blueprint = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref input) = args.input {
        info!(input = %input.display(), "Overriding input log from CLI");
        blueprint.input.path = input.clone();
    }
    if args.strict {
        info!("Strict mode enabled from CLI");
        blueprint.dispatch.strict = true;
    }
    ConfigLoader::validate(&blueprint).context("Invalid configuration after CLI overrides")?;

    info!(
        input = %blueprint.input.path.display(),
        strict = blueprint.dispatch.strict,
        dt_min = blueprint.dispatch.gate.dt_min,
        dt_max = blueprint.dispatch.gate.dt_max,
        "Configuration loaded"
    );

    let replay = Replay::new(ReplayConfig {
        blueprint,
        print_initial: true,
        metrics_out: args.metrics_out.clone(),
    });

    info!("Starting replay...");
    let stats = replay.run().context("Replay execution failed")?;

    info!(
        lines = stats.summary.lines_read,
        propagations = stats.summary.dispatch.propagations,
        skipped = stats.summary.skipped(),
        duration_secs = stats.duration.as_secs_f64(),
        "Replay completed successfully"
    );

    // Print final state and statistics
    stats.print_summary();

    info!("Legged Replay finished");
    Ok(())
}
