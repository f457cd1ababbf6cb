//! Compile event types for worker-to-renderer handoff and JSON output.
//!
//! Events cross from the worker thread to the rendering side over a
//! single-producer queue (FIFO); the same types double as the stable JSON
//! schema emitted under `--message-format=json`. New fields may be added,
//! but existing fields should not be removed or renamed.

use std::path::PathBuf;

use serde::Serialize;

/// An event emitted during a compile or install operation.
///
/// Each event is serialized as a single JSON object per line.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum CompileEvent {
    /// The operation started.
    #[serde(rename = "started")]
    Started {
        /// Operation name ("compile" or "install")
        operation: String,
    },

    /// Source analysis completed.
    #[serde(rename = "analysis")]
    Analysis {
        /// WinForms usage detected
        winforms: bool,
        /// WPF usage detected
        wpf: bool,
        /// Modern template bootstrap detected
        appconfig_init: bool,
        /// The SDK pipeline is preferred
        prefers_dotnet: bool,
    },

    /// A backend was chosen.
    #[serde(rename = "backend-selected")]
    BackendSelected {
        /// Backend name ("csc" or "dotnet")
        backend: String,
        /// Path to the backend binary
        path: PathBuf,
    },

    /// One filtered line of captured external-process output.
    #[serde(rename = "log")]
    Log {
        /// The line text
        line: String,
    },

    /// A phase's raw transcript was persisted.
    #[serde(rename = "phase-log-saved")]
    PhaseLogSaved {
        /// Phase name (e.g. "legacy-compile")
        phase: String,
        /// Where the raw log was written
        path: PathBuf,
    },

    /// The produced executable was delivered.
    #[serde(rename = "artifact")]
    Artifact {
        /// Final output path
        path: PathBuf,
    },

    /// A generic diagnostic message.
    #[serde(rename = "diagnostic")]
    Diagnostic {
        /// Severity level ("error", "warning", "note")
        level: String,
        /// Message text
        message: String,
    },

    /// The operation completed (success or failure).
    #[serde(rename = "finished")]
    Finished {
        /// Whether the operation succeeded
        success: bool,
        /// Total duration in milliseconds
        duration_ms: u64,
    },
}

impl CompileEvent {
    /// Create a started event.
    pub fn started(operation: impl Into<String>) -> Self {
        CompileEvent::Started {
            operation: operation.into(),
        }
    }

    /// Create a log-line event.
    pub fn log(line: impl Into<String>) -> Self {
        CompileEvent::Log { line: line.into() }
    }

    /// Create a note diagnostic.
    pub fn note(message: impl Into<String>) -> Self {
        CompileEvent::Diagnostic {
            level: "note".to_string(),
            message: message.into(),
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        CompileEvent::Diagnostic {
            level: "warning".to_string(),
            message: message.into(),
        }
    }

    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        CompileEvent::Diagnostic {
            level: "error".to_string(),
            message: message.into(),
        }
    }

    /// Create a finished event.
    pub fn finished(success: bool, duration_ms: u64) -> Self {
        CompileEvent::Finished {
            success,
            duration_ms,
        }
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
