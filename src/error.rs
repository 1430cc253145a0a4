//! Error handling module for devbox-provision
//!
//! Provides the error types shared by the plan loader, the state machine and
//! the runner. Step failures are values (`StepError`) rather than early
//! returns, because a failed step is an expected outcome the runner records.

use crate::state::TransitionError;
use std::io;
use thiserror::Error;

/// Why a single step did not succeed.
#[derive(Error, Debug)]
pub enum StepError {
    /// The command could not be started (missing binary, permission denied)
    #[error("failed to launch `{command}`: {source}")]
    LaunchFailure {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The command started but exited unsuccessfully
    #[error("`{command}` {}", describe_exit(.code))]
    ExecutionFailure { command: String, code: Option<i32> },
}

fn describe_exit(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

impl StepError {
    /// Returns true if the process was never started
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, Self::LaunchFailure { .. })
    }
}

/// Main error type for devbox-provision
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// IO errors (plan files, output streams)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Plan file could not be parsed
    #[error("Plan parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A plan failed validation
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// Runner state machine was driven out of order
    #[error("State error: {0}")]
    Transition(#[from] TransitionError),
}

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, ProvisionError>;

impl ProvisionError {
    /// Create a plan validation error
    pub fn invalid_plan(msg: impl Into<String>) -> Self {
        Self::InvalidPlan(msg.into())
    }
}
