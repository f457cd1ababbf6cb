//! Build request and derived build plan.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::analyzer::SourceFeatures;
use crate::backend::{BackendKind, BackendPreference, TargetKind};

/// Base target framework moniker; desktop sources get the `-windows`
/// qualifier appended.
pub const DEFAULT_TARGET_FRAMEWORK: &str = "net8.0";

/// Reference assemblies the Framework compiler needs for WinForms source.
const WINFORMS_REFERENCES: &[&str] = &["System.Windows.Forms.dll", "System.Drawing.dll"];

/// Reference assemblies the Framework compiler needs for WPF source.
const WPF_REFERENCES: &[&str] = &[
    "PresentationFramework.dll",
    "PresentationCore.dll",
    "WindowsBase.dll",
];

/// Everything the caller supplies for one compile attempt.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Path to the C# source file. Must reference a readable file.
    pub source: PathBuf,

    /// Where to place the produced executable. Must be non-empty.
    pub output: PathBuf,

    /// Backend preference.
    pub preference: BackendPreference,

    /// Kind of executable to produce.
    pub target_kind: TargetKind,

    /// Publish a self-contained executable (SDK path only).
    pub self_contained: bool,

    /// Publish a single-file executable (SDK path only).
    pub single_file: bool,
}

/// The derived plan consumed by the execution step. Never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// Which backend to invoke.
    pub backend: BackendKind,

    /// Target framework moniker for the generated project.
    pub target_framework: String,

    /// The output needs the Windows desktop runtime.
    pub requires_windows_desktop: bool,

    /// Reference assemblies to pass to the Framework compiler.
    pub extra_references: BTreeSet<String>,

    /// Kind of executable, passed through verbatim from the request.
    pub target_kind: TargetKind,
}

impl BuildPlan {
    /// Derive the plan for a selected backend.
    ///
    /// Pure and idempotent: identical inputs yield identical plans.
    pub fn derive(
        features: &SourceFeatures,
        request: &BuildRequest,
        backend: BackendKind,
        base_framework: &str,
    ) -> BuildPlan {
        let desktop = features.needs_windows_desktop();

        let target_framework = if desktop {
            format!("{}-windows", base_framework)
        } else {
            base_framework.to_string()
        };

        let mut extra_references = BTreeSet::new();
        if backend == BackendKind::Csc {
            if features.uses_winforms {
                extra_references.extend(WINFORMS_REFERENCES.iter().map(|s| s.to_string()));
            }
            if features.uses_wpf {
                extra_references.extend(WPF_REFERENCES.iter().map(|s| s.to_string()));
            }
        }

        BuildPlan {
            backend,
            target_framework,
            requires_windows_desktop: desktop,
            extra_references,
            target_kind: request.target_kind,
        }
    }
}

/// Resolve the target kind for a request being finalized.
///
/// An explicit caller choice always wins; otherwise desktop sources
/// default to a windowed executable and everything else to a console one.
/// This runs once, when the source file is picked, before the request is
/// built.
pub fn resolve_target_kind(
    explicit: Option<TargetKind>,
    features: &SourceFeatures,
) -> TargetKind {
    match explicit {
        Some(kind) => kind,
        None if features.uses_winforms || features.uses_wpf => TargetKind::Windowed,
        None => TargetKind::Console,
    }
}

/// Runtime identifier for the host CPU architecture.
pub fn runtime_identifier() -> &'static str {
    match std::env::consts::ARCH {
        "aarch64" => "win-arm64",
        "arm" => "win-arm",
        "x86" => "win-x86",
        _ => "win-x64",
    }
}
