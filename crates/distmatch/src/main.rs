//! DistMatch CLI
//!
//! ```bash
//! distmatch replay demos/walk_stop.ron          # Tick-by-tick table
//! distmatch replay demos/walk_stop.ron --json   # Records as JSON
//! distmatch check demos/walk_stop.ron           # Curve diagnostics
//! distmatch lookup demos/walk_stop.ron -d 25 65 # Distance to time
//! ```

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{CheckArgs, Cli, Commands, LookupArgs, ReplayArgs};
use distmatch_core::{CurveBuffer, DistanceMatcher, IssueSeverity};
use distmatch_io::{replay, Scenario, TickRecord};
use std::fmt::Write as _;
use std::process::ExitCode;
use tracing::{error, info};

mod cli;
mod logging_setup;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match logging_setup::init(&cli.log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when the command ran but found problems
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Replay(args) => run_replay(&args),
        Commands::Check(args) => run_check(&args),
        Commands::Lookup(args) => run_lookup(&args),
    }
}

fn load(path: &std::path::Path) -> Result<Scenario> {
    Scenario::load(path).with_context(|| format!("Failed to load scenario {}", path.display()))
}

fn run_replay(args: &ReplayArgs) -> Result<bool> {
    let scenario = load(&args.file)?;
    let records = replay(&scenario)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", format_records(&records));
    }
    Ok(true)
}

fn run_check(args: &CheckArgs) -> Result<bool> {
    let scenario = load(&args.file)?;
    let mut clean = true;

    for (name, issues) in scenario.diagnostics() {
        if issues.is_empty() {
            println!("{name}: ok");
            continue;
        }
        for issue in issues {
            clean &= issue.severity < IssueSeverity::Error;
            match issue.key_index {
                Some(key) => println!("{name}: [{:?}] {} (key #{key})", issue.severity, issue.message),
                None => println!("{name}: [{:?}] {}", issue.severity, issue.message),
            }
        }
    }

    Ok(clean)
}

fn run_lookup(args: &LookupArgs) -> Result<bool> {
    let scenario = load(&args.file)?;
    let name = args
        .sequence
        .as_deref()
        .or(scenario.sequence.as_deref())
        .or_else(|| scenario.sequences.first().map(|s| s.name.as_str()))
        .ok_or_else(|| anyhow!("Scenario '{}' has no sequences", scenario.name))?;
    let sequence = scenario
        .find_sequence(name)
        .ok_or_else(|| anyhow!("Unknown sequence: {name}"))?;

    let mut buffer = CurveBuffer::empty();
    buffer.rebuild(Some(sequence), &scenario.node.distance_curve_name)?;

    let mut matcher = DistanceMatcher::from_config(&scenario.node);
    matcher.cache_enabled = !args.no_cache;
    info!(
        "Looking up {} distances on {} ({} keys)",
        args.distance.len(),
        sequence.name,
        buffer.len()
    );

    for &distance in &args.distance {
        let time = matcher.lookup(&buffer, distance);
        println!("{distance:>10.3}  {time:>8.4}");
    }
    Ok(true)
}

fn format_records(records: &[TickRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:>10}  {:<10}  {:>8}  asset",
        "tick", "distance", "state", "time"
    );
    for record in records {
        let _ = writeln!(
            out,
            "{:>5}  {:>10.3}  {:<10}  {:>8.4}  {}",
            record.tick,
            record.distance,
            record.state.to_string(),
            record.time,
            record.asset.as_deref().unwrap_or("-")
        );
    }
    out
}
