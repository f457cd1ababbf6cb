//! Legacy backend: direct csc.exe invocation.

use std::path::Path;

use anyhow::Result;

use crate::backend::{BuildPlan, BuildRequest, Invoked};
use crate::util::fs::ensure_dir;
use crate::util::logs::{LogDir, Phase};
use crate::util::process::ProcessBuilder;

/// Assemble the csc.exe argument list for a plan.
///
/// Order matters to the Framework compiler: options first, source last.
pub fn build_args(plan: &BuildPlan, request: &BuildRequest) -> Vec<String> {
    let mut args = vec![
        "/nologo".to_string(),
        format!("/target:{}", plan.target_kind.csc_target()),
        format!("/out:{}", request.output.display()),
    ];

    for reference in &plan.extra_references {
        args.push(format!("/r:{}", reference));
    }

    args.push(request.source.display().to_string());
    args
}

/// Invoke csc.exe and persist the raw transcript.
///
/// csc writes the executable straight to the requested output path, so
/// `produced` is simply that path when the compile succeeded and the file
/// exists. Exit-code interpretation is left to the caller.
pub fn compile(
    csc: &Path,
    plan: &BuildPlan,
    request: &BuildRequest,
    logs: &LogDir,
) -> Result<Invoked> {
    if let Some(parent) = request.output.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    let builder = ProcessBuilder::new(csc).args(build_args(plan, request));
    let command = builder.display_command();

    let captured = builder.exec_capture()?;
    let log_path = logs.write_phase(Phase::LegacyCompile, &captured.output)?;

    let produced =
        (captured.success() && request.output.is_file()).then(|| request.output.clone());

    Ok(Invoked {
        command,
        transcript: captured.output,
        log_path,
        code: captured.code,
        produced,
    })
}
