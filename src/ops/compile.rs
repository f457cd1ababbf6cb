//! Implementation of `csforge build`: the full compile pipeline.
//!
//! validate inputs -> read source -> analyze -> detect backends -> select
//! -> (provision once and retry) -> derive plan -> invoke -> deliver
//! artifact. The pipeline runs to completion on the worker that calls it
//! and reports progress only through the event sink.

use std::path::PathBuf;

use thiserror::Error;

use crate::analyzer::analyze;
use crate::backend::plan::resolve_target_kind;
use crate::backend::{
    csc, dotnet, select_backend, BackendKind, BackendPreference, BackendSet, BuildPlan,
    BuildRequest, Invoked, TargetKind,
};
use crate::ops::events::CompileEvent;
use crate::ops::provision::provision_sdk;
use crate::ops::runner::EventSink;
use crate::util::context::GlobalContext;
use crate::util::filter::display_lines;
use crate::util::fs::read_source_text;
use crate::util::logs::Phase;

/// Hint attached to legacy-compiler failures.
const CSC_TOO_OLD_HINT: &str =
    "the .NET Framework csc.exe is often too old for modern C# syntax; try --backend dotnet";

/// Terminal failures of one compile attempt.
///
/// Nothing is retried automatically except the single provisioning step
/// for a missing backend; every variant here ends the attempt.
#[derive(Debug, Error)]
pub enum CompileError {
    /// No valid source file. Reported before any external process starts.
    #[error("source file not found or not readable: {path}")]
    MissingSource { path: PathBuf },

    /// Empty output path. Reported before any external process starts.
    #[error("output path must not be empty")]
    EmptyOutputPath,

    /// A forced or selected backend turned out to be absent, and
    /// provisioning (where applicable) did not produce it.
    #[error("backend `{backend}` is not available")]
    BackendUnavailable { backend: BackendKind },

    /// Nothing resolvable even after the provisioning attempt.
    #[error("no compiler backend available (csc.exe or dotnet SDK)")]
    NoBackend,

    /// The external compiler exited nonzero.
    #[error("{backend} failed with exit code {code:?}")]
    BackendExit {
        backend: BackendKind,
        code: Option<i32>,
    },

    /// The external compiler exited zero but no executable appeared.
    #[error("{backend} reported success but no executable was produced")]
    ArtifactMissing { backend: BackendKind },

    /// Spawn or filesystem failure around an invocation.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CompileError {
    /// An actionable hint to surface alongside the error, when one exists.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CompileError::BackendExit {
                backend: BackendKind::Csc,
                ..
            } => Some(CSC_TOO_OLD_HINT),
            CompileError::BackendUnavailable {
                backend: BackendKind::Csc,
            } => Some("csc.exe ships with the .NET Framework and cannot be auto-installed"),
            _ => None,
        }
    }
}

/// Options for the compile operation, as collected from CLI and config.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Path to the C# source file.
    pub source: PathBuf,

    /// Output path; defaults to the source path with an `.exe` extension.
    pub output: Option<PathBuf>,

    /// Backend preference.
    pub preference: BackendPreference,

    /// Explicit target kind; when unset, desktop sources default to
    /// windowed.
    pub target_kind: Option<TargetKind>,

    /// Publish self-contained output (SDK path).
    pub self_contained: bool,

    /// Publish single-file output (SDK path).
    pub single_file: bool,

    /// Base target framework moniker.
    pub base_framework: String,

    /// Release channel for a provisioning attempt.
    pub channel: String,

    /// Never attempt provisioning.
    pub offline: bool,
}

/// Run one compile attempt. Returns the delivered artifact path.
pub fn compile(
    ctx: &GlobalContext,
    opts: &CompileOptions,
    sink: &EventSink,
) -> Result<PathBuf, CompileError> {
    // Missing-input failures never start an external process.
    if !opts.source.is_file() {
        return Err(CompileError::MissingSource {
            path: opts.source.clone(),
        });
    }

    let output = match &opts.output {
        Some(path) if path.as_os_str().is_empty() => return Err(CompileError::EmptyOutputPath),
        Some(path) => path.clone(),
        None => opts.source.with_extension("exe"),
    };

    sink.emit(CompileEvent::note(format!("source: {}", opts.source.display())));
    sink.emit(CompileEvent::note(format!("output: {}", output.display())));

    let text = read_source_text(&opts.source).map_err(|_| CompileError::MissingSource {
        path: opts.source.clone(),
    })?;

    let features = analyze(&text);
    tracing::debug!(?features, "source analysis");
    sink.emit(CompileEvent::Analysis {
        winforms: features.uses_winforms,
        wpf: features.uses_wpf,
        appconfig_init: features.has_appconfig_init,
        prefers_dotnet: features.prefers_dotnet,
    });

    let request = BuildRequest {
        source: opts.source.clone(),
        output,
        preference: opts.preference,
        target_kind: resolve_target_kind(opts.target_kind, &features),
        self_contained: opts.self_contained,
        single_file: opts.single_file,
    };

    let mut backends = BackendSet::detect(ctx);
    let mut selected = select_backend(
        &features,
        request.preference,
        backends.csc.is_some(),
        backends.dotnet.is_some(),
    );

    // One provisioning attempt when the SDK is what's missing. The
    // Framework compiler is never provisionable.
    let needs_provision = match selected {
        None => true,
        Some(BackendKind::Dotnet) => backends.dotnet.is_none(),
        Some(BackendKind::Csc) => false,
    };

    if needs_provision {
        if opts.offline {
            sink.emit(CompileEvent::warning(
                "no usable backend and provisioning is disabled (offline)",
            ));
        } else {
            sink.emit(CompileEvent::note("no usable backend, attempting SDK install"));
            if let Err(e) = provision_sdk(ctx, &opts.channel, sink) {
                sink.emit(CompileEvent::warning(format!("provisioning failed: {:#}", e)));
            }
            backends = BackendSet::detect(ctx);
            selected = select_backend(
                &features,
                request.preference,
                backends.csc.is_some(),
                backends.dotnet.is_some(),
            );
        }
    }

    let Some(backend) = selected else {
        return Err(CompileError::NoBackend);
    };

    let plan = BuildPlan::derive(&features, &request, backend, &opts.base_framework);

    let invoked = match backend {
        BackendKind::Csc => {
            let Some(csc_path) = backends.csc.clone() else {
                return Err(CompileError::BackendUnavailable { backend });
            };
            sink.emit(CompileEvent::BackendSelected {
                backend: backend.to_string(),
                path: csc_path.clone(),
            });
            csc::compile(&csc_path, &plan, &request, &ctx.log_dir())?
        }
        BackendKind::Dotnet => {
            let Some(dotnet_path) = backends.dotnet.clone() else {
                return Err(CompileError::BackendUnavailable { backend });
            };
            sink.emit(CompileEvent::BackendSelected {
                backend: backend.to_string(),
                path: dotnet_path.clone(),
            });
            sink.emit(CompileEvent::note(format!(
                "target framework: {}",
                plan.target_framework
            )));
            dotnet::publish(&dotnet_path, &features, &plan, &request, &ctx.log_dir())?
        }
    };

    report_invocation(sink, backend, &invoked);

    if !invoked.success() {
        return Err(CompileError::BackendExit {
            backend,
            code: invoked.code,
        });
    }

    let Some(artifact) = invoked.produced else {
        return Err(CompileError::ArtifactMissing { backend });
    };

    sink.emit(CompileEvent::Artifact {
        path: artifact.clone(),
    });
    Ok(artifact)
}

fn report_invocation(sink: &EventSink, backend: BackendKind, invoked: &Invoked) {
    sink.emit(CompileEvent::note(format!("command: {}", invoked.command)));

    let phase = match backend {
        BackendKind::Csc => Phase::LegacyCompile,
        BackendKind::Dotnet => Phase::ModernPublish,
    };
    sink.emit(CompileEvent::PhaseLogSaved {
        phase: phase.to_string(),
        path: invoked.log_path.clone(),
    });

    for line in display_lines(&invoked.transcript) {
        sink.emit(CompileEvent::log(line));
    }
}
