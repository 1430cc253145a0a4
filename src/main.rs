//! devbox-provision - Main entry point
//!
//! With no arguments, runs the built-in desktop toolchain plan against the
//! host's package manager.

use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use devbox_provision::cli::{Cli, Commands};
use devbox_provision::{
    ConsoleSink, DryRunLauncher, RunPlan, RunReport, Runner, SystemLauncher,
    desktop_toolchain_plan,
};

/// Initialize tracing on stderr; RUST_LOG overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);
    info!("devbox-provision starting up");

    match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            debug!("dispatch failed: {:?}", e);
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<ExitCode> {
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let plan = load_plan(cli.plan.as_deref())?;
            run_plan(plan, cli.dry_run)
        }
        Commands::Validate { path } => {
            let plan = load_plan(Some(&path))?;
            println!("✓ Plan is valid: {} step(s) in {:?}", plan.len(), path);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show => {
            let plan = load_plan(cli.plan.as_deref())?;
            println!("{}", plan.to_json()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load the plan file if one was given, else the built-in plan; either way validated
fn load_plan(path: Option<&Path>) -> Result<RunPlan> {
    let plan = match path {
        Some(path) => {
            info!("Loading plan from {:?}", path);
            RunPlan::load_from_file(path)?
        }
        None => desktop_toolchain_plan(),
    };
    plan.validate()?;
    Ok(plan)
}

fn run_plan(plan: RunPlan, dry_run: bool) -> Result<ExitCode> {
    let report = if dry_run {
        Runner::new(DryRunLauncher, ConsoleSink::new()).run(plan)?
    } else {
        Runner::new(SystemLauncher, ConsoleSink::new()).run(plan)?
    };
    Ok(exit_code_for(&report))
}

/// Non-zero only when a step that does not allow continuing failed
fn exit_code_for(report: &RunReport) -> ExitCode {
    for tolerated in report.tolerated_failures() {
        warn!("{} failed but allows continuing", tolerated.step.name);
    }

    match report.stopped_at() {
        Some(failed) => info!("Plan halted by {}", failed.step.name),
        None => info!("Plan finished"),
    }
    ExitCode::from(report.exit_code())
}
