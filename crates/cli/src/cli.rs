//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Legged Replay - feed a recorded legged-robot measurement log to a state estimator
#[derive(Parser, Debug)]
#[command(
    name = "legged-replay",
    author,
    version,
    about = "Replay IMU / contact / kinematic logs into a state estimator",
    long_about = "Replays a recorded measurement log line by line.\n\n\
                  IMU records drive gated propagation, CONTACT records replace the \n\
                  contact hypothesis, and KINEMATIC records apply forward-kinematic \n\
                  corrections."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LEGGED_REPLAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "LEGGED_REPLAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a measurement log
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "replay.toml",
        env = "LEGGED_REPLAY_CONFIG"
    )]
    pub config: PathBuf,

    /// Override the measurement log path from configuration
    #[arg(short, long, env = "LEGGED_REPLAY_INPUT")]
    pub input: Option<PathBuf>,

    /// Abort on the first malformed line instead of skipping it
    #[arg(long, env = "LEGGED_REPLAY_STRICT")]
    pub strict: bool,

    /// Write Prometheus text-format metrics to this file after the replay
    #[arg(long, env = "LEGGED_REPLAY_METRICS_OUT")]
    pub metrics_out: Option<PathBuf>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "replay.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "replay.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args() {
        let cli = Cli::try_parse_from([
            "legged-replay",
            "run",
            "--config",
            "cfg.toml",
            "--input",
            "log.txt",
            "--strict",
            "--metrics-out",
            "metrics.prom",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("cfg.toml"));
                assert_eq!(args.input, Some(PathBuf::from("log.txt")));
                assert!(args.strict);
                assert_eq!(args.metrics_out, Some(PathBuf::from("metrics.prom")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["legged-replay", "-q", "-v", "info"]).is_err());
    }
}
