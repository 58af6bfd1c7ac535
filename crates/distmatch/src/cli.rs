//! CLI command definitions using clap

use clap::{Parser, Subcommand};
use distmatch_core::LogConfig;
use std::path::PathBuf;

/// DistMatch: replay and inspect distance matched animation playback
#[derive(Parser, Debug)]
#[command(name = "distmatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error, off); RUST_LOG overrides it
    #[arg(long, default_value = "warn", global = true, env = "DISTMATCH_LOG")]
    pub log_level: String,

    /// Also write logs to a timestamped file
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Directory for log files
    #[arg(long, default_value = "logs", global = true)]
    pub log_dir: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Logging settings from the global flags
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            file_output: self.log_file,
            log_directory: self.log_dir.clone(),
            ..LogConfig::default()
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the node through a scenario's recorded ticks
    Replay(ReplayArgs),

    /// Report distance curve problems in a scenario
    Check(CheckArgs),

    /// Look up times for distances on a scenario's sequence
    Lookup(LookupArgs),
}

/// Arguments for the replay command
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Scenario file (.ron or .json)
    pub file: PathBuf,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Scenario file (.ron or .json)
    pub file: PathBuf,
}

/// Arguments for the lookup command
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// Scenario file (.ron or .json)
    pub file: PathBuf,

    /// Sequence to search; defaults to the scenario's bound sequence
    #[arg(short, long)]
    pub sequence: Option<String>,

    /// Distances to look up, in query order
    #[arg(short, long, required = true, num_args = 1.., allow_negative_numbers = true)]
    pub distance: Vec<f32>,

    /// Search the whole curve on every query
    #[arg(long)]
    pub no_cache: bool,
}
