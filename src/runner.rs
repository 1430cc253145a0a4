//! The provisioning runner.
//!
//! Executes a `RunPlan` one step at a time: announce, launch, wait, classify,
//! then apply the step's failure policy. Nothing runs concurrently, so a
//! step's output always finishes before the next announcement is written.

use crate::error::{Result, StepError};
use crate::launcher::Launcher;
use crate::plan::{RunPlan, Step};
use crate::sink::OutputSink;
use crate::state::RunState;
use std::io::Write;
use std::time::{Duration, Instant};
use strum::Display;
use tracing::{debug, error, info, warn};

/// How a step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum StepStatus {
    Succeeded,
    /// Exited unsuccessfully; `code` is None when killed by a signal
    Failed { code: Option<i32> },
    LaunchFailed,
}

impl From<&StepError> for StepStatus {
    fn from(err: &StepError) -> Self {
        match err {
            StepError::LaunchFailure { .. } => Self::LaunchFailed,
            StepError::ExecutionFailure { code, .. } => Self::Failed { code: *code },
        }
    }
}

/// Outcome of one attempted step
#[derive(Debug, Clone)]
pub struct RunResult {
    pub step: Step,
    pub status: StepStatus,
    /// The text printed after `Error:` when the step failed
    pub error_detail: Option<String>,
    pub started: Instant,
    pub finished: Instant,
}

impl RunResult {
    pub fn succeeded(&self) -> bool {
        self.status == StepStatus::Succeeded
    }

    pub fn duration(&self) -> Duration {
        self.finished.duration_since(self.started)
    }
}

/// Results of a whole run, in execution order
#[derive(Debug, Clone)]
pub struct RunReport {
    results: Vec<RunResult>,
    state: RunState,
}

impl RunReport {
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<RunResult> {
        self.results
    }

    /// Terminal state the run ended in
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == RunState::Completed
    }

    /// The failed step that halted the plan, if any
    pub fn stopped_at(&self) -> Option<&RunResult> {
        match self.state {
            RunState::Stopped(_) => self.results.last(),
            _ => None,
        }
    }

    /// Process exit code for this run: 1 if a step halted the plan, else 0.
    ///
    /// Failures of steps that allow continuing do not change the code.
    pub fn exit_code(&self) -> u8 {
        match self.state {
            RunState::Stopped(_) => 1,
            _ => 0,
        }
    }

    /// Failed steps that allowed the plan to continue
    pub fn tolerated_failures(&self) -> impl Iterator<Item = &RunResult> {
        self.results
            .iter()
            .filter(|r| !r.succeeded() && r.step.continue_on_failure)
    }
}

/// Runs a plan through a `Launcher`, writing operator output to an `OutputSink`.
///
/// A runner is single-use: after one `run` it sits in a terminal state and a
/// second `run` fails with a state error.
pub struct Runner<L, S> {
    launcher: L,
    sink: S,
    state: RunState,
}

impl<L: Launcher, S: OutputSink> Runner<L, S> {
    pub fn new(launcher: L, sink: S) -> Self {
        Self {
            launcher,
            sink,
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Execute every step in order until the plan completes or a
    /// non-continuable step fails. Steps after a halting failure are dropped
    /// unlaunched.
    ///
    /// # Errors
    ///
    /// Only a reused runner is an error. Step failures are reported in the
    /// returned `RunReport`; a sink that cannot be written to is logged and
    /// does not stop the plan.
    pub fn run(&mut self, plan: RunPlan) -> Result<RunReport> {
        let total = plan.len();
        let mut results = Vec::with_capacity(total);
        info!("Starting plan with {} step(s)", total);

        if total == 0 {
            self.state = self.state.transition(RunState::Completed)?;
        }

        for (index, step) in plan.into_iter().enumerate() {
            self.state = self.state.transition(RunState::Running(index))?;
            info!("Step {}/{}: {}", index + 1, total, step.name);

            let result = self.run_step(step);
            let halt = !result.succeeded() && !result.step.continue_on_failure;
            results.push(result);

            if halt {
                self.state = self.state.transition(RunState::Stopped(index))?;
                warn!(
                    "Plan stopped at step {}; {} step(s) not attempted",
                    index + 1,
                    total - index - 1
                );
                return Ok(RunReport {
                    results,
                    state: self.state,
                });
            }

            if index + 1 == total {
                self.state = self.state.transition(RunState::Completed)?;
            }
        }

        info!("Plan completed");
        Ok(RunReport {
            results,
            state: self.state,
        })
    }

    /// Write one operator line; a failed write is logged, never fatal
    fn say(&mut self, line: &str) {
        let out = self.sink.stdout();
        if let Err(e) = writeln!(out, "{}", line).and_then(|()| out.flush()) {
            warn!("Could not write {:?} to output: {}", line, e);
        }
    }

    fn run_step(&mut self, step: Step) -> RunResult {
        let command_line = step.command_line();

        self.say(&format!("Running: {}", command_line));

        let started = Instant::now();
        let launched = self.launcher.launch(&step, &mut self.sink);
        let finished = Instant::now();

        let failure = match launched {
            Ok(exit) if exit.success() => None,
            Ok(exit) => Some(StepError::ExecutionFailure {
                command: command_line,
                code: exit.code,
            }),
            Err(source) => Some(StepError::LaunchFailure {
                command: step.command.clone(),
                source,
            }),
        };

        let (status, error_detail) = match failure {
            None => {
                debug!("{} succeeded in {:?}", step.name, finished - started);
                (StepStatus::Succeeded, None)
            }
            Some(err) => {
                error!("{} failed: {}", step.name, err);
                self.say(&format!("Error: {}", err));
                (StepStatus::from(&err), Some(err.to_string()))
            }
        };

        RunResult {
            step,
            status,
            error_detail,
            started,
            finished,
        }
    }
}
