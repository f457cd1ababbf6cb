//! Best-effort SDK provisioning.
//!
//! When no backend is resolvable the compile operation tries exactly once
//! to install the dotnet SDK: first through winget, then by downloading
//! the official installer script and running it into the csforge tool
//! home. Only the SDK is provisionable; there is no unattended install
//! path for the Framework compiler.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::ops::events::CompileEvent;
use crate::ops::runner::EventSink;
use crate::util::context::GlobalContext;
use crate::util::filter::display_lines;
use crate::util::fs::ensure_dir;
use crate::util::logs::{LogDir, Phase};
use crate::util::process::{find_executable, ProcessBuilder};

/// winget package id for the SDK.
const SDK_PACKAGE_ID: &str = "Microsoft.DotNet.SDK.8";

/// Official installer script location.
const INSTALL_SCRIPT_URL: &str = "https://dot.net/v1/dotnet-install.ps1";

/// Arguments for an unattended winget install of the SDK.
fn winget_args() -> Vec<String> {
    vec![
        "install".to_string(),
        "-e".to_string(),
        "--id".to_string(),
        SDK_PACKAGE_ID.to_string(),
        "--accept-package-agreements".to_string(),
        "--accept-source-agreements".to_string(),
        "--silent".to_string(),
    ]
}

/// Arguments for running the downloaded installer script.
fn install_script_args(script: &Path, channel: &str, install_dir: &Path) -> Vec<String> {
    vec![
        "-NoProfile".to_string(),
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-File".to_string(),
        script.display().to_string(),
        "-Channel".to_string(),
        channel.to_string(),
        "-InstallDir".to_string(),
        install_dir.display().to_string(),
        "-NoPath".to_string(),
    ]
}

/// Locate a PowerShell host for the installer script.
fn find_powershell() -> Option<PathBuf> {
    if let Some(path) = find_executable("powershell") {
        return Some(path);
    }
    if let Some(path) = find_executable("pwsh") {
        return Some(path);
    }

    let fallback =
        PathBuf::from(r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe");
    fallback.is_file().then_some(fallback)
}

fn emit_transcript(sink: &EventSink, phase: Phase, log_path: &Path, transcript: &str) {
    sink.emit(CompileEvent::PhaseLogSaved {
        phase: phase.to_string(),
        path: log_path.to_path_buf(),
    });
    for line in display_lines(transcript) {
        sink.emit(CompileEvent::log(line));
    }
}

/// Try to provision the dotnet SDK.
///
/// Returns `Ok` when an install step completed; the caller re-detects
/// backends afterwards rather than trusting the installer's exit status
/// alone.
pub fn provision_sdk(ctx: &GlobalContext, channel: &str, sink: &EventSink) -> Result<()> {
    let logs = ctx.log_dir();

    if try_winget(&logs, sink)? {
        return Ok(());
    }

    install_via_script(ctx, channel, &logs, sink)
}

/// Attempt the winget path. `Ok(false)` means winget was absent or failed
/// and the scripted fallback should run.
fn try_winget(logs: &LogDir, sink: &EventSink) -> Result<bool> {
    let Some(winget) = find_executable("winget") else {
        sink.emit(CompileEvent::note("winget not found, using installer script"));
        return Ok(false);
    };

    sink.emit(CompileEvent::note(format!(
        "installing {} via winget",
        SDK_PACKAGE_ID
    )));

    let captured = ProcessBuilder::new(&winget).args(winget_args()).exec_capture()?;
    let log_path = logs.write_phase(Phase::CompilerInstall, &captured.output)?;
    emit_transcript(sink, Phase::CompilerInstall, &log_path, &captured.output);

    if captured.success() {
        Ok(true)
    } else {
        sink.emit(CompileEvent::warning(format!(
            "winget install failed (code {:?}), falling back to installer script",
            captured.code
        )));
        Ok(false)
    }
}

/// Download the official installer script and run it into the tool home.
fn install_via_script(
    ctx: &GlobalContext,
    channel: &str,
    logs: &LogDir,
    sink: &EventSink,
) -> Result<()> {
    let tools_dir = ctx.tools_dir();
    ensure_dir(&tools_dir)?;
    let script = tools_dir.join("dotnet-install.ps1");

    sink.emit(CompileEvent::note(format!("downloading {}", INSTALL_SCRIPT_URL)));

    let download_result = download_script(&script);
    let download_log = match &download_result {
        Ok(bytes) => format!("GET {}\nsaved {} bytes to {}\n", INSTALL_SCRIPT_URL, bytes, script.display()),
        Err(e) => format!("GET {}\nfailed: {:#}\n", INSTALL_SCRIPT_URL, e),
    };
    let log_path = logs.write_phase(Phase::Download, &download_log)?;
    sink.emit(CompileEvent::PhaseLogSaved {
        phase: Phase::Download.to_string(),
        path: log_path,
    });
    download_result.context("failed to download the SDK installer script")?;

    let Some(powershell) = find_powershell() else {
        bail!("no PowerShell host found to run the installer script");
    };

    let install_dir = ctx.local_sdk_dir();
    sink.emit(CompileEvent::note(format!(
        "installing dotnet SDK ({}) into {}",
        channel,
        install_dir.display()
    )));

    let captured = ProcessBuilder::new(&powershell)
        .args(install_script_args(&script, channel, &install_dir))
        .exec_capture()?;
    let log_path = logs.write_phase(Phase::SdkInstall, &captured.output)?;
    emit_transcript(sink, Phase::SdkInstall, &log_path, &captured.output);

    if !captured.success() {
        bail!("SDK installer script failed with code {:?}", captured.code);
    }

    if !ctx.local_dotnet().is_file() {
        bail!(
            "installer finished but {} was not created",
            ctx.local_dotnet().display()
        );
    }

    Ok(())
}

fn download_script(dest: &Path) -> Result<usize> {
    let response = reqwest::blocking::get(INSTALL_SCRIPT_URL)
        .context("request failed")?
        .error_for_status()
        .context("server returned an error status")?;

    let body = response.bytes().context("failed to read response body")?;
    std::fs::write(dest, &body)
        .with_context(|| format!("failed to write {}", dest.display()))?;

    Ok(body.len())
}
