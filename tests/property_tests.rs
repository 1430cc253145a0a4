//! Property-Based Tests for the runner
//!
//! Uses proptest over random plans (per-step exit code and failure policy)
//! to check the ordering and halting invariants.

use devbox_provision::{
    CaptureSink, Launcher, OutputSink, ProcessExit, RunPlan, RunState, Runner, Step,
};
use proptest::prelude::*;
use std::io;

/// Returns each step's exit code from its first argument and logs the launch order
#[derive(Default)]
struct ArgCodeLauncher {
    launched: Vec<usize>,
}

impl Launcher for ArgCodeLauncher {
    fn launch(&mut self, step: &Step, _sink: &mut dyn OutputSink) -> io::Result<ProcessExit> {
        let index: usize = step.name.parse().map_err(io::Error::other)?;
        self.launched.push(index);
        let code: i32 = step.arguments[0].parse().map_err(io::Error::other)?;
        Ok(ProcessExit::with_code(code))
    }
}

/// (exit code, continue_on_failure) per step; code 0 about half the time
fn steps_strategy() -> impl Strategy<Value = Vec<(i32, bool)>> {
    prop::collection::vec((prop_oneof![Just(0), 1..=255i32], any::<bool>()), 0..8)
}

fn build_plan(spec: &[(i32, bool)]) -> RunPlan {
    RunPlan::new(
        spec.iter()
            .enumerate()
            .map(|(i, &(code, cont))| {
                Step::new(i.to_string(), "tool")
                    .arg(code.to_string())
                    .continue_on_failure(cont)
            })
            .collect(),
    )
}

/// Index of the first failing step that does not allow continuing
fn first_halt(spec: &[(i32, bool)]) -> Option<usize> {
    spec.iter().position(|&(code, cont)| code != 0 && !cont)
}

proptest! {
    /// Launches happen in plan order and stop right after the first halting failure
    #[test]
    fn launches_follow_plan_order(spec in steps_strategy()) {
        let mut runner = Runner::new(ArgCodeLauncher::default(), CaptureSink::new());
        let report = runner.run(build_plan(&spec)).unwrap();

        let expected_len = first_halt(&spec).map_or(spec.len(), |i| i + 1);
        let expected: Vec<usize> = (0..expected_len).collect();
        prop_assert_eq!(&runner.launcher().launched, &expected);
        prop_assert_eq!(report.results().len(), expected_len);
    }

    /// The terminal state matches the first halting failure, if any
    #[test]
    fn terminal_state_matches_policy(spec in steps_strategy()) {
        let mut runner = Runner::new(ArgCodeLauncher::default(), CaptureSink::new());
        let report = runner.run(build_plan(&spec)).unwrap();

        match first_halt(&spec) {
            Some(i) => prop_assert_eq!(report.state(), RunState::Stopped(i)),
            None => prop_assert_eq!(report.state(), RunState::Completed),
        }
        prop_assert!(report.state().is_terminal());
        prop_assert_eq!(runner.state(), report.state());
    }

    /// Result timestamps are monotonic with no overlap between steps
    #[test]
    fn results_never_overlap(spec in steps_strategy()) {
        let mut runner = Runner::new(ArgCodeLauncher::default(), CaptureSink::new());
        let report = runner.run(build_plan(&spec)).unwrap();

        for result in report.results() {
            prop_assert!(result.started <= result.finished);
        }
        for pair in report.results().windows(2) {
            prop_assert!(pair[0].finished <= pair[1].started);
        }
    }

    /// One announcement per attempted step, one error line per failed step
    #[test]
    fn output_lines_match_results(spec in steps_strategy()) {
        let mut runner = Runner::new(ArgCodeLauncher::default(), CaptureSink::new());
        let report = runner.run(build_plan(&spec)).unwrap();

        let out = runner.sink().stdout_text();
        let announced = out.lines().filter(|l| l.starts_with("Running: ")).count();
        let errors = out.lines().filter(|l| l.starts_with("Error: ")).count();
        let failed = report.results().iter().filter(|r| !r.succeeded()).count();

        prop_assert_eq!(announced, report.results().len());
        prop_assert_eq!(errors, failed);
    }
}
