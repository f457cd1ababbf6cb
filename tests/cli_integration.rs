//! CLI integration tests for csforge.
//!
//! These tests only exercise flows that don't require an installed
//! backend: argument validation, missing-input failures, doctor output,
//! and the machine-readable event stream.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the csforge binary command.
fn csforge() -> Command {
    Command::cargo_bin("csforge").unwrap()
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a minimal console source file.
fn write_source(dir: &TempDir, name: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(
        &path,
        "using System;\nclass Program { static void Main() { Console.WriteLine(\"hi\"); } }\n",
    )
    .unwrap();
    path
}

// ============================================================================
// csforge build - input validation
// ============================================================================

#[test]
fn test_build_missing_source_fails() {
    let tmp = temp_dir();

    csforge()
        .args(["build", "nope.cs", "--offline"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("source file not found"));
}

#[test]
fn test_build_invalid_backend_rejected() {
    let tmp = temp_dir();
    let source = write_source(&tmp, "app.cs");

    csforge()
        .args(["build", source.to_str().unwrap(), "--backend", "gcc"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid backend"));
}

#[test]
fn test_build_invalid_target_kind_rejected() {
    let tmp = temp_dir();
    let source = write_source(&tmp, "app.cs");

    csforge()
        .args(["build", source.to_str().unwrap(), "--target-kind", "dll"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid target kind"));
}

#[test]
fn test_build_forced_csc_unavailable() {
    // Only meaningful where no Framework compiler exists.
    if csforge::backend::detect::find_csc().is_some() {
        return;
    }

    let tmp = temp_dir();
    let source = write_source(&tmp, "app.cs");

    csforge()
        .args([
            "build",
            source.to_str().unwrap(),
            "--backend",
            "csc",
            "--offline",
        ])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available"));
}

// ============================================================================
// csforge build - JSON event stream
// ============================================================================

#[test]
fn test_build_json_events_on_failure() {
    let tmp = temp_dir();

    csforge()
        .args([
            "build",
            "nope.cs",
            "--offline",
            "--message-format",
            "json",
        ])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"reason\":\"started\""))
        .stdout(predicate::str::contains("\"reason\":\"diagnostic\""))
        .stdout(predicate::str::contains("\"success\":false"));
}

#[test]
fn test_invalid_message_format_rejected() {
    let tmp = temp_dir();

    csforge()
        .args(["build", "nope.cs", "--message-format", "xml"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid message format"));
}

// ============================================================================
// csforge doctor
// ============================================================================

#[test]
fn test_doctor_prints_report() {
    // Exit status depends on what's installed; only the report shape is
    // asserted.
    let output = csforge().arg("doctor").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("csforge doctor"));
    assert!(stdout.contains("Checks:"));
    assert!(stdout.contains("Summary:"));
}

#[test]
fn test_doctor_verbose_includes_messages() {
    let output = csforge().args(["doctor", "--verbose"]).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("Environment:"));
}

// ============================================================================
// csforge completions / help
// ============================================================================

#[test]
fn test_completions_bash() {
    csforge()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("csforge"));
}

#[test]
fn test_help_lists_commands() {
    csforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("doctor"))
        .stdout(predicate::str::contains("install"));
}
