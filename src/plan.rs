//! Provisioning plans: the ordered list of steps a run executes.
//!
//! A `RunPlan` is built once (from the built-in definition or a JSON plan
//! file), validated, handed to the runner by value and consumed. There are no
//! mutating accessors, so a plan cannot change underneath a run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ProvisionError;

/// One external command within a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Human-readable label used in logs and reports
    pub name: String,
    /// Executable name or path
    pub command: String,
    /// Arguments passed to the executable, in order
    #[serde(default)]
    pub arguments: Vec<String>,
    /// Whether the plan keeps going after this step fails
    #[serde(default)]
    pub continue_on_failure: bool,
}

impl Step {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            arguments: Vec::new(),
            continue_on_failure: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn continue_on_failure(mut self, continue_on_failure: bool) -> Self {
        self.continue_on_failure = continue_on_failure;
        self
    }

    /// The command and its arguments joined by spaces, as announced to the operator
    pub fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.arguments.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn validate(&self, index: usize) -> std::result::Result<(), ProvisionError> {
        if self.name.trim().is_empty() {
            return Err(ProvisionError::invalid_plan(format!(
                "step {} has no name",
                index
            )));
        }
        if self.command.trim().is_empty() {
            return Err(ProvisionError::invalid_plan(format!(
                "step {} ({}) has no command",
                index, self.name
            )));
        }
        // A bare name with spaces is almost always a shell line; paths may contain spaces
        let is_path = Path::new(&self.command).components().count() > 1;
        if !is_path && self.command.chars().any(char::is_whitespace) {
            return Err(ProvisionError::invalid_plan(format!(
                "step {} ({}): command {:?} contains whitespace; put arguments in \"arguments\"",
                index, self.name, self.command
            )));
        }
        Ok(())
    }
}

/// Ordered, immutable sequence of steps for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunPlan {
    steps: Vec<Step>,
}

impl RunPlan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn builder() -> RunPlanBuilder {
        RunPlanBuilder::default()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check every step for a usable name and command.
    ///
    /// An empty plan is valid; running it completes immediately.
    pub fn validate(&self) -> std::result::Result<(), ProvisionError> {
        self.steps
            .iter()
            .enumerate()
            .try_for_each(|(index, step)| step.validate(index))
    }

    /// Load a plan from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read plan from {:?}", path.as_ref()))?;

        let plan: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse plan JSON in {:?}", path.as_ref()))?;

        Ok(plan)
    }

    /// Save the plan to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json()?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write plan to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Pretty-printed JSON form of the plan
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize plan to JSON")
    }
}

impl IntoIterator for RunPlan {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

/// Incremental construction of a `RunPlan`
#[derive(Debug, Default)]
pub struct RunPlanBuilder {
    steps: Vec<Step>,
}

impl RunPlanBuilder {
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> RunPlan {
        RunPlan::new(self.steps)
    }
}
