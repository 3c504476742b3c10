//! Replay orchestrator - wires configuration, dispatcher and estimator.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::ReplayBlueprint;
use dispatcher::{create_dispatcher, LogEstimator, StateEstimator};
use tracing::info;

use super::ReplayStats;

/// Replay configuration
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// The validated replay blueprint
    pub blueprint: ReplayBlueprint,

    /// Print noise parameters and initial state before replaying
    pub print_initial: bool,

    /// Prometheus text export after the replay (None = disabled)
    pub metrics_out: Option<PathBuf>,
}

/// Main replay orchestrator
pub struct Replay {
    config: ReplayConfig,
}

impl Replay {
    /// Create a new replay with the given configuration
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    /// Run the replay to completion
    pub fn run(self) -> Result<ReplayStats> {
        let blueprint = self.config.blueprint;

        // Initialize Metrics (optional)
        let metrics = match self.config.metrics_out {
            Some(ref path) => {
                info!(path = %path.display(), "Metrics export enabled");
                Some(observability::init_metrics_recorder()?)
            }
            None => None,
        };

        let initial_state = blueprint.initial_robot_state();

        if self.config.print_initial {
            println!("{}", blueprint.noise);
            println!("{initial_state}");
        }

        let mut dispatcher = create_dispatcher(
            blueprint.dispatch,
            LogEstimator::new("log"),
            initial_state,
            blueprint.noise,
        );

        let start = Instant::now();
        let summary = dispatcher
            .run_path(&blueprint.input.path)
            .with_context(|| format!("Replay of {} failed", blueprint.input.path.display()))?;
        let duration = start.elapsed();

        if let (Some(handle), Some(path)) = (metrics, &self.config.metrics_out) {
            std::fs::write(path, handle.render())
                .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
            info!(path = %path.display(), "Metrics written");
        }

        let estimator = dispatcher.into_estimator();
        info!(
            estimator = estimator.name(),
            propagations = estimator.propagations(),
            corrections = estimator.corrections(),
            legs = estimator.contacts().len(),
            "Estimator finished"
        );

        Ok(ReplayStats {
            duration,
            final_state: estimator.state().clone(),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DispatchConfig, InitialStateConfig, InputConfig, NoiseParams};
    use std::io::Write;

    fn blueprint(path: &std::path::Path, strict: bool) -> ReplayBlueprint {
        ReplayBlueprint {
            version: Default::default(),
            input: InputConfig {
                path: path.to_path_buf(),
            },
            dispatch: DispatchConfig {
                strict,
                ..Default::default()
            },
            initial_state: InitialStateConfig::default(),
            noise: NoiseParams::default(),
        }
    }

    #[test]
    fn test_replay_counts() {
        let mut log = tempfile::NamedTempFile::new().unwrap();
        writeln!(log, "IMU 0.00 0 0 0 0 0 9.81").unwrap();
        writeln!(log, "IMU 0.01 0 0 0 0 0 9.81").unwrap();
        writeln!(log, "CONTACT 0.015 0 1 1 1 2 0 3 0").unwrap();
        writeln!(log, "not a record").unwrap();
        writeln!(log, "IMU 0.02 0 0 0 0 0 9.81").unwrap();

        let stats = Replay::new(ReplayConfig {
            blueprint: blueprint(log.path(), false),
            print_initial: false,
            metrics_out: None,
        })
        .run()
        .unwrap();

        assert_eq!(stats.summary.lines_read, 5);
        assert_eq!(stats.summary.dispatch.propagations, 2);
        assert_eq!(stats.summary.dispatch.contact_updates, 1);
        assert_eq!(stats.summary.dispatch.ignored, 1);
        // LogEstimator does not move the state
        assert_eq!(stats.final_state.rotation[(1, 1)], -1.0);
    }

    #[test]
    fn test_replay_writes_metrics() {
        let mut log = tempfile::NamedTempFile::new().unwrap();
        writeln!(log, "IMU 0.00 0 0 0 0 0 0").unwrap();
        writeln!(log, "IMU 0.01 0 0 0 0 0 0").unwrap();
        writeln!(log, "IMU 0.02 0 0").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("replay.prom");

        Replay::new(ReplayConfig {
            blueprint: blueprint(log.path(), false),
            print_initial: false,
            metrics_out: Some(out.clone()),
        })
        .run()
        .unwrap();

        let rendered = std::fs::read_to_string(&out).unwrap();
        assert!(rendered.contains("legged_replay_records_parsed_total"));
        assert!(rendered.contains("legged_replay_records_rejected_total"));
        assert!(rendered.contains("reason=\"malformed\""));
    }

    #[test]
    fn test_strict_replay_fails() {
        let mut log = tempfile::NamedTempFile::new().unwrap();
        writeln!(log, "IMU 0.00 0 0 0").unwrap();

        let result = Replay::new(ReplayConfig {
            blueprint: blueprint(log.path(), true),
            print_initial: false,
            metrics_out: None,
        })
        .run();

        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("line 1"));
    }
}
