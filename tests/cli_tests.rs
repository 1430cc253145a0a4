//! Tests for the devbox-provision binary
//!
//! These tests verify the process exit code:
//! - 1 when a step that does not allow continuing fails
//! - 0 when only continuable steps fail
//! - 1 when the plan file cannot be loaded or validated

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run_with_plan(plan: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_devbox-provision"))
        .arg("--plan")
        .arg(plan)
        .args(extra)
        .env_remove("RUST_LOG")
        .output()
        .expect("Should be able to run the binary")
}

fn write_plan(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("plan.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_halting_failure_exits_one() {
    let dir = tempdir().unwrap();
    let plan = write_plan(
        dir.path(),
        r#"{ "steps": [
            { "name": "fails", "command": "false" },
            { "name": "never", "command": "true" }
        ] }"#,
    );

    let output = run_with_plan(&plan, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("Running: false"));
    assert!(stdout.contains("Error: `false` exited with status 1"));
    assert!(!stdout.contains("Running: true"));
}

#[test]
fn test_tolerated_failure_exits_zero() {
    let dir = tempdir().unwrap();
    let plan = write_plan(
        dir.path(),
        r#"{ "steps": [
            { "name": "fails", "command": "false", "continue_on_failure": true },
            { "name": "ok", "command": "true" }
        ] }"#,
    );

    let output = run_with_plan(&plan, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("Running: true"));
}

#[test]
fn test_missing_plan_file_exits_one() {
    let dir = tempdir().unwrap();
    let output = run_with_plan(&dir.path().join("absent.json"), &[]);

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr.matches("Failed to read plan").count(), 1, "reported once: {}", stderr);
    assert!(stderr.starts_with("✗ "));
}

#[test]
fn test_invalid_plan_exits_one_without_running() {
    let dir = tempdir().unwrap();
    let plan = write_plan(
        dir.path(),
        r#"{ "steps": [ { "name": "update", "command": "sudo apt-get update" } ] }"#,
    );

    let output = run_with_plan(&plan, &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid plan"));
}

#[test]
fn test_dry_run_exits_zero_for_failing_plan() {
    let dir = tempdir().unwrap();
    let plan = write_plan(
        dir.path(),
        r#"{ "steps": [ { "name": "fails", "command": "false" } ] }"#,
    );

    let output = run_with_plan(&plan, &["--dry-run"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("[DRY RUN] Skipped: false"));
}
