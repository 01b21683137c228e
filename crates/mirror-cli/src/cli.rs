//! CLI argument parsing using clap derive

use clap::Parser;
use std::path::PathBuf;

/// Folder Mirror - keep a destination directory reconciled to a source
/// directory
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source directory to mirror from
    pub source: PathBuf,

    /// Destination directory to mirror into
    pub dest: PathBuf,

    /// Poll interval in seconds; omit (or pass 0) to run a single cycle
    /// and exit
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Directory holding the persisted location store
    ///
    /// Defaults to the platform data directory plus "mirror".
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Delete orphans on first sighting instead of deferring one cycle
    #[arg(long)]
    pub immediate_deletes: bool,

    /// Preview changes without modifying the destination or the store
    #[arg(long)]
    pub dry_run: bool,

    /// Output the cycle report as JSON for scripting (single-cycle runs)
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
