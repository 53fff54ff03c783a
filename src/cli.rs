// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::default_config_path;
use crate::types::parse_duration;

/// Command-line arguments for `snapctl`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "snapctl",
    version,
    about = "Snapshot tagged database clusters with bounded parallelism.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SNAPCTL_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Discover matching clusters and snapshot them.
    Backup(BackupArgs),
    /// Show which clusters would be snapshotted, without creating anything.
    Plan(ConfigArgs),
    /// Load and validate a config file.
    Validate(ConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Path to the config file (TOML).
    #[arg(short = 'c', long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct BackupArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Maximum snapshots outstanding at once. Overrides `[backup].parallel`.
    #[arg(short = 'p', long, value_name = "N")]
    pub parallel: Option<usize>,

    /// Delay before each status polling round, e.g. `30s`.
    /// Overrides `[backup].poll_interval`.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub poll_interval: Option<Duration>,

    /// Fail a snapshot after this many consecutive status-check errors.
    /// Overrides `[backup].max_poll_failures`.
    #[arg(long, value_name = "N")]
    pub max_poll_failures: Option<u32>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
