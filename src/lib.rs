//! csforge - a compiler driver for single-file C# programs
//!
//! This crate provides the core library functionality for csforge,
//! including source analysis, backend selection, build planning, and
//! invocation of the external compiler backends.

pub mod analyzer;
pub mod backend;
pub mod ops;
pub mod util;

pub use analyzer::SourceFeatures;
pub use backend::{BackendKind, BackendPreference, BuildPlan, BuildRequest, TargetKind};
pub use util::context::GlobalContext;
