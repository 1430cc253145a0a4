use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// devbox-provision - install the packages needed to build the desktop app
#[derive(Parser)]
#[command(name = "devbox-provision")]
#[command(about = "Runs the package manager steps that prepare a desktop app build host")]
#[command(version)]
pub struct Cli {
    /// JSON plan file to use instead of the built-in plan
    #[arg(long, global = true)]
    pub plan: Option<PathBuf>,

    /// Dry-run mode: announce each step without launching it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the plan (default when no command is given)
    Run,
    /// Check a plan file without running it
    Validate {
        /// Path to the plan file
        path: PathBuf,
    },
    /// Print the plan that would run, as JSON
    Show,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
