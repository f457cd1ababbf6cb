//! Renders worker events into the shell.
//!
//! The worker reports exclusively through the event queue; this is the
//! consuming side, and the only place events become human or JSON output.

use std::sync::mpsc::Receiver;

use csforge::ops::CompileEvent;
use csforge::util::shell::{Shell, Status};
use indicatif::ProgressBar;

/// Drain the event queue until the worker drops its sender.
///
/// Returns whether the operation reported success.
pub fn drain_events(shell: &Shell, spinner: &ProgressBar, rx: Receiver<CompileEvent>) -> bool {
    let mut success = false;

    for event in rx {
        if let CompileEvent::Finished { success: ok, .. } = &event {
            success = *ok;
        }

        if shell.is_json() {
            if let Ok(value) = serde_json::to_value(&event) {
                shell.json_event(&value);
            }
        } else {
            spinner.suspend(|| render_human(shell, &event));
        }
    }

    success
}

fn render_human(shell: &Shell, event: &CompileEvent) {
    match event {
        CompileEvent::Started { operation } => {
            if operation == "install" {
                shell.status(Status::Installing, "dotnet SDK");
            }
        }
        CompileEvent::Analysis {
            winforms,
            wpf,
            appconfig_init,
            prefers_dotnet,
        } => {
            shell.status(
                Status::Analyzing,
                format!(
                    "winforms={} wpf={} appconfig_init={} prefers_dotnet={}",
                    winforms, wpf, appconfig_init, prefers_dotnet
                ),
            );
        }
        CompileEvent::BackendSelected { backend, path } => {
            shell.status(Status::Backend, format!("{} -> {}", backend, path.display()));
        }
        CompileEvent::Log { line } => shell.line(line),
        CompileEvent::PhaseLogSaved { phase, path } => {
            shell.note(format!("[{}] raw log saved to {}", phase, path.display()));
        }
        CompileEvent::Artifact { path } => {
            shell.status(Status::Copied, path.display().to_string());
        }
        CompileEvent::Diagnostic { level, message } => match level.as_str() {
            "error" => shell.error(message),
            "warning" => shell.warn(message),
            _ => shell.note(message),
        },
        CompileEvent::Finished {
            success,
            duration_ms,
        } => {
            if *success {
                shell.status(
                    Status::Finished,
                    format!("in {:.2}s", *duration_ms as f64 / 1000.0),
                );
            }
        }
    }
}
