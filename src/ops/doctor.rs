//! Environment and backend health checks.
//!
//! The `doctor` command performs fast environment checks to verify that a
//! compiler backend is reachable and the provisioning tools exist.
//!
//! ## Checks Performed
//!
//! - csc.exe availability (Framework locations + PATH)
//! - dotnet SDK availability (PATH, ProgramFiles, local install)
//! - winget availability (optional, used for provisioning)
//! - PowerShell availability (optional, used for the installer script)

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::backend::detect::{find_csc, find_dotnet};
use crate::util::context::GlobalContext;
use crate::util::process::{find_executable, ProcessBuilder};

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,

    /// How long the check took
    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the tool path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,

    /// Environment information
    pub environment: HashMap<String, String>,
}

impl DoctorReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        DoctorReport::default()
    }

    /// Add a check result.
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Get the count of passed checks.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get the count of failed checks.
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get the count of required failed checks.
    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

/// Run the doctor checks.
///
/// Neither backend is individually required, but at least one of them is:
/// when both are missing, both checks are reported as required failures.
pub fn doctor(ctx: &GlobalContext) -> Result<DoctorReport> {
    let start = Instant::now();
    let mut report = DoctorReport::new();

    report
        .environment
        .insert("os".to_string(), std::env::consts::OS.to_string());
    report
        .environment
        .insert("arch".to_string(), std::env::consts::ARCH.to_string());

    let csc = check_csc();
    let dotnet = check_dotnet(ctx);

    // A single available backend is enough to compile.
    let any_backend = csc.passed || dotnet.passed;
    report.add(if any_backend { csc.optional() } else { csc });
    report.add(if any_backend { dotnet.optional() } else { dotnet });

    report.add(check_winget());
    report.add(check_powershell());

    report.total_duration = start.elapsed();
    Ok(report)
}

/// Check for the Framework compiler.
fn check_csc() -> CheckResult {
    let start = Instant::now();

    match find_csc() {
        Some(path) => CheckResult::pass("csc.exe", "Framework compiler found")
            .with_path(path)
            .with_duration(start.elapsed()),
        None => CheckResult::fail(
            "csc.exe",
            "not found (checked PATH and %WINDIR%\\Microsoft.NET)",
        )
        .with_duration(start.elapsed()),
    }
}

/// Check for the dotnet SDK.
fn check_dotnet(ctx: &GlobalContext) -> CheckResult {
    let start = Instant::now();

    let Some(path) = find_dotnet(ctx) else {
        return CheckResult::fail(
            "dotnet SDK",
            "not found (run `csforge install` to provision it)",
        )
        .with_duration(start.elapsed());
    };

    let mut result = CheckResult::pass("dotnet SDK", "dotnet host found").with_path(path.clone());

    if let Ok(captured) = ProcessBuilder::new(&path).arg("--version").exec_capture() {
        if captured.success() {
            if let Some(version) = captured.output.lines().next() {
                result = result.with_version(version.trim().to_string());
            }
        }
    }

    result.with_duration(start.elapsed())
}

/// Check for winget.
fn check_winget() -> CheckResult {
    let start = Instant::now();

    match find_executable("winget") {
        Some(path) => CheckResult::pass("winget", "winget is available")
            .with_path(path)
            .with_duration(start.elapsed())
            .optional(),
        None => CheckResult::fail(
            "winget",
            "winget not found (optional, used for SDK provisioning)",
        )
        .with_duration(start.elapsed())
        .optional(),
    }
}

/// Check for a PowerShell host.
fn check_powershell() -> CheckResult {
    let start = Instant::now();

    for host in ["powershell", "pwsh"] {
        if let Some(path) = find_executable(host) {
            return CheckResult::pass("PowerShell", format!("{} is available", host))
                .with_path(path)
                .with_duration(start.elapsed())
                .optional();
        }
    }

    CheckResult::fail(
        "PowerShell",
        "no PowerShell host found (optional, used for the SDK installer script)",
    )
    .with_duration(start.elapsed())
    .optional()
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    writeln!(output, "csforge doctor").unwrap();
    writeln!(output, "==============\n").unwrap();

    if verbose {
        writeln!(output, "Environment:").unwrap();
        writeln!(
            output,
            "  OS: {} ({})",
            report
                .environment
                .get("os")
                .unwrap_or(&"unknown".to_string()),
            report
                .environment
                .get("arch")
                .unwrap_or(&"unknown".to_string())
        )
        .unwrap();
        writeln!(output).unwrap();
    }

    writeln!(output, "Checks:").unwrap();
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };

        writeln!(output, "  {} {}{}", status, check.name, required).unwrap();

        if verbose {
            writeln!(output, "      {}", check.message).unwrap();
            if let Some(path) = &check.path {
                writeln!(output, "      Path: {}", path.display()).unwrap();
            }
            if let Some(version) = &check.version {
                writeln!(output, "      Version: {}", version).unwrap();
            }
        }
    }

    writeln!(output).unwrap();

    let passed = report.passed_count();
    let failed = report.failed_count();
    let required_failed = report.required_failed_count();

    writeln!(output, "Summary: {} passed, {} failed", passed, failed).unwrap();

    if required_failed > 0 {
        writeln!(
            output,
            "\nNo compiler backend is available. Run `csforge install` or install the dotnet SDK manually."
        )
        .unwrap();
    } else if failed > 0 {
        writeln!(
            output,
            "\nAll required checks passed. {} optional check(s) failed.",
            failed
        )
        .unwrap();
    } else {
        writeln!(output, "\nAll checks passed. csforge is ready to use.").unwrap();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_pass() {
        let result = CheckResult::pass("test", "passed");
        assert!(result.passed);
        assert!(result.required);
    }

    #[test]
    fn test_check_result_optional() {
        let result = CheckResult::pass("test", "passed").optional();
        assert!(result.passed);
        assert!(!result.required);
    }

    #[test]
    fn test_doctor_report_all_passed() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("check1", "ok"));
        report.add(CheckResult::pass("check2", "ok"));

        assert!(report.all_required_passed());
        assert_eq!(report.passed_count(), 2);
        assert_eq!(report.failed_count(), 0);
    }

    #[test]
    fn test_doctor_report_optional_failed() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("required", "ok"));
        report.add(CheckResult::fail("optional", "missing").optional());

        assert!(report.all_required_passed());
        assert_eq!(report.required_failed_count(), 0);
    }

    #[test]
    fn test_doctor_report_required_failed() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("check1", "ok"));
        report.add(CheckResult::fail("check2", "missing"));

        assert!(!report.all_required_passed());
        assert_eq!(report.required_failed_count(), 1);
    }

    #[test]
    fn test_doctor_runs() {
        let ctx = GlobalContext::new().unwrap();
        let report = doctor(&ctx).unwrap();

        // csc, dotnet, winget, powershell
        assert_eq!(report.checks.len(), 4);
    }

    #[test]
    fn test_format_report_contains_summary() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("csc.exe", "found"));

        let text = format_report(&report, false);
        assert!(text.contains("csforge doctor"));
        assert!(text.contains("Summary: 1 passed, 0 failed"));
    }
}
