//! devbox-provision library
//!
//! A small provisioning runner: an ordered `RunPlan` of external commands is
//! executed one step at a time, each step's output streamed to the operator,
//! with a per-step policy deciding whether a failure halts the plan.

pub mod cli;
pub mod defaults;
pub mod error;
pub mod launcher;
pub mod plan;
pub mod runner;
pub mod sink;
pub mod state;

// Re-export main types for convenience
pub use defaults::desktop_toolchain_plan;
pub use error::{ProvisionError, StepError};
pub use launcher::{DryRunLauncher, Launcher, ProcessExit, SystemLauncher};
pub use plan::{RunPlan, RunPlanBuilder, Step};
pub use runner::{RunReport, RunResult, Runner, StepStatus};
pub use sink::{CaptureSink, ConsoleSink, OutputSink, StreamMode};
pub use state::{RunState, TransitionError};
