//! Folder Mirror CLI
//!
//! One-directional folder mirroring from the command line: reconciles a
//! destination directory to match a source directory, once or on a poll
//! interval.

mod cli;
mod error;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use mirror_core::{CycleReport, LocationStore, MirrorEngine, MirrorOptions, poll};

use cli::Cli;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let store_path = state_dir(&cli)?.join("locations.toml");
    let store = LocationStore::open(store_path)?;

    let options = MirrorOptions {
        defer_deletes: !cli.immediate_deletes,
        dry_run: cli.dry_run,
    };
    let mut engine = MirrorEngine::new(&cli.source, &cli.dest, store, options)?;

    // zero behaves like omitting: a single cycle
    let interval = cli.interval.filter(|secs| *secs > 0).map(Duration::from_secs);
    let report = poll::run(&mut engine, interval);

    print_report(&report, cli.json)?;
    if report.success {
        Ok(())
    } else {
        Err(CliError::user("cycle finished with errors"))
    }
}

fn state_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.state_dir {
        return Ok(dir.clone());
    }
    dirs::data_local_dir()
        .map(|dir| dir.join("mirror"))
        .ok_or_else(|| CliError::user("could not determine a state directory; pass --state-dir"))
}

fn print_report(report: &CycleReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if report.is_quiet() {
        println!(
            "{} Nothing to do. Destination is up to date.",
            "OK".green().bold()
        );
        return Ok(());
    }
    for action in &report.actions {
        println!("   {} {}", "-".green(), action);
    }
    for error in &report.errors {
        println!("   {} {}", "!".red(), error);
    }
    Ok(())
}
