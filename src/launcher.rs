//! Process launching for plan steps.
//!
//! `Launcher` is the seam between the runner and the operating system. The
//! runner decides order and policy; a launcher only starts one step's
//! process, waits for it, and reports how it ended.
//!
//! # Stream handling
//!
//! - `StreamMode::Inherit`: stdout/stderr are the parent's own handles, so
//!   package manager progress and `sudo` prompts appear live.
//! - `StreamMode::Capture`: stdout/stderr are piped and copied into the sink
//!   once the process exits.
//!
//! Stdin is always inherited so privilege escalation can prompt.

use crate::plan::Step;
use crate::sink::{OutputSink, StreamMode};
use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

/// How a launched process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code (None if terminated by signal)
    pub code: Option<i32>,
}

impl ProcessExit {
    pub const SUCCESS: Self = Self { code: Some(0) };

    pub fn with_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ProcessExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Starts a step's process and blocks until it exits.
///
/// An `Err` means the process never started; any exit, successful or not,
/// is an `Ok(ProcessExit)`. Once the process has run, problems writing its
/// output to the sink are logged rather than returned.
pub trait Launcher {
    fn launch(&mut self, step: &Step, sink: &mut dyn OutputSink) -> io::Result<ProcessExit>;
}

/// Runs steps as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&mut self, step: &Step, sink: &mut dyn OutputSink) -> io::Result<ProcessExit> {
        info!(
            "launch: {} command={} args={:?}",
            step.name, step.command, step.arguments
        );

        let mut cmd = Command::new(&step.command);
        cmd.args(&step.arguments).stdin(Stdio::inherit());

        let exit = match sink.stream_mode() {
            StreamMode::Inherit => {
                let status = cmd
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()?;
                ProcessExit::from(status)
            }
            StreamMode::Capture => {
                let output = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).output()?;
                let copied = sink
                    .stdout()
                    .write_all(&output.stdout)
                    .and_then(|()| sink.stderr().write_all(&output.stderr));
                if let Err(e) = copied {
                    warn!("Could not copy output of {} to the sink: {}", step.name, e);
                }
                ProcessExit::from(output.status)
            }
        };

        debug!("{} exited with {:?}", step.name, exit.code);
        Ok(exit)
    }
}

/// Announces what would run without starting anything
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunLauncher;

impl Launcher for DryRunLauncher {
    fn launch(&mut self, step: &Step, sink: &mut dyn OutputSink) -> io::Result<ProcessExit> {
        info!("[DRY RUN] skipping {}", step.name);
        if let Err(e) = writeln!(sink.stdout(), "[DRY RUN] Skipped: {}", step.command_line()) {
            warn!("Could not write dry-run notice for {}: {}", step.name, e);
        }
        Ok(ProcessExit::SUCCESS)
    }
}
