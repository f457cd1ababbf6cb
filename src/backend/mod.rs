//! Compiler backends: kinds, detection, selection, build planning, and the
//! two invocation adapters.

use std::fmt;
use std::path::PathBuf;

pub mod csc;
pub mod detect;
pub mod dotnet;
pub mod plan;
pub mod select;

pub use detect::BackendSet;
pub use plan::{BuildPlan, BuildRequest};
pub use select::select_backend;

/// Result of one external backend invocation.
///
/// The adapter has already persisted the raw transcript to the phase log;
/// interpreting the exit code and the artifact state is the caller's job.
#[derive(Debug)]
pub struct Invoked {
    /// The command line, for display.
    pub command: String,

    /// Raw merged output, lossy-decoded.
    pub transcript: String,

    /// Where the raw transcript was persisted.
    pub log_path: PathBuf,

    /// Exit code, if the process exited normally.
    pub code: Option<i32>,

    /// The executable delivered to the requested output path, when the
    /// invocation succeeded and actually produced one.
    pub produced: Option<PathBuf>,
}

impl Invoked {
    /// Whether the external process exited with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// The two external compiler backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// .NET Framework csc.exe - fast, but cannot target modern windowing
    /// toolkits or newer language syntax.
    Csc,
    /// dotnet SDK publish pipeline - compiles via a generated project file.
    Dotnet,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Csc => write!(f, "csc"),
            BackendKind::Dotnet => write!(f, "dotnet"),
        }
    }
}

/// Caller's backend preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// Pick based on source analysis and availability.
    #[default]
    Auto,
    /// Always use csc.exe, even if it turns out to be absent.
    ForceCsc,
    /// Always use the dotnet SDK.
    ForceDotnet,
}

impl std::str::FromStr for BackendPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(BackendPreference::Auto),
            "csc" => Ok(BackendPreference::ForceCsc),
            "dotnet" => Ok(BackendPreference::ForceDotnet),
            _ => Err(format!(
                "invalid backend '{}'; expected 'auto', 'csc', or 'dotnet'",
                s
            )),
        }
    }
}

impl fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendPreference::Auto => write!(f, "auto"),
            BackendPreference::ForceCsc => write!(f, "csc"),
            BackendPreference::ForceDotnet => write!(f, "dotnet"),
        }
    }
}

/// Kind of executable to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetKind {
    /// Console application (keeps a console window).
    #[default]
    Console,
    /// Windows GUI application (no console window).
    Windowed,
}

impl TargetKind {
    /// The `/target:` value understood by csc.exe.
    pub fn csc_target(&self) -> &'static str {
        match self {
            TargetKind::Console => "exe",
            TargetKind::Windowed => "winexe",
        }
    }

    /// The `OutputType` project property understood by the SDK.
    pub fn output_type(&self) -> &'static str {
        match self {
            TargetKind::Console => "Exe",
            TargetKind::Windowed => "WinExe",
        }
    }
}

impl std::str::FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "exe" => Ok(TargetKind::Console),
            "windowed" | "winexe" => Ok(TargetKind::Windowed),
            _ => Err(format!(
                "invalid target kind '{}'; expected 'console' or 'windowed'",
                s
            )),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Console => write!(f, "console"),
            TargetKind::Windowed => write!(f, "windowed"),
        }
    }
}
