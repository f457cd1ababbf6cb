//! Backend detection.
//!
//! Locates the two external compilers with the following priority:
//! - csc.exe: PATH lookup, then the canonical v4 Framework locations under
//!   `%WINDIR%`, then any other versioned Framework directory (newest
//!   first).
//! - dotnet: PATH lookup, then `%ProgramFiles%\dotnet`, then a locally
//!   provisioned SDK under the csforge home.

use std::path::PathBuf;

use glob::glob;

use crate::util::context::GlobalContext;
use crate::util::process::find_executable;

/// Snapshot of which backends are present and where.
///
/// Re-taken after a provisioning attempt; never cached across operations.
#[derive(Debug, Clone, Default)]
pub struct BackendSet {
    /// Path to csc.exe, if found.
    pub csc: Option<PathBuf>,

    /// Path to the dotnet host, if found.
    pub dotnet: Option<PathBuf>,
}

impl BackendSet {
    /// Probe the environment for both backends.
    pub fn detect(ctx: &GlobalContext) -> Self {
        BackendSet {
            csc: find_csc(),
            dotnet: find_dotnet(ctx),
        }
    }

    /// Whether neither backend is available.
    pub fn is_empty(&self) -> bool {
        self.csc.is_none() && self.dotnet.is_none()
    }
}

/// Candidate paths for the Framework compiler, highest priority first.
fn csc_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = find_executable("csc") {
        candidates.push(path);
    }

    let windir = std::env::var("WINDIR").unwrap_or_else(|_| r"C:\Windows".to_string());
    let net_root = PathBuf::from(windir).join("Microsoft.NET");

    for framework in ["Framework64", "Framework"] {
        candidates.push(
            net_root
                .join(framework)
                .join("v4.0.30319")
                .join("csc.exe"),
        );
    }

    // Any other installed version, newest first.
    for framework in ["Framework64", "Framework"] {
        let pattern = net_root.join(framework).join("v*");
        if let Ok(entries) = glob(&pattern.to_string_lossy()) {
            let mut versions: Vec<PathBuf> = entries.filter_map(|e| e.ok()).collect();
            versions.sort();
            versions.reverse();
            for version_dir in versions {
                candidates.push(version_dir.join("csc.exe"));
            }
        }
    }

    candidates
}

/// Find the Framework compiler, if installed.
pub fn find_csc() -> Option<PathBuf> {
    csc_candidates().into_iter().find(|p| p.is_file())
}

/// Find the dotnet host, if installed.
pub fn find_dotnet(ctx: &GlobalContext) -> Option<PathBuf> {
    if let Some(path) = find_executable("dotnet") {
        return Some(path);
    }

    if let Ok(program_files) = std::env::var("ProgramFiles") {
        let name = if cfg!(windows) { "dotnet.exe" } else { "dotnet" };
        let candidate = PathBuf::from(program_files).join("dotnet").join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    let local = ctx.local_dotnet();
    if local.is_file() {
        return Some(local);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_include_v4_locations() {
        let candidates = csc_candidates();
        assert!(candidates
            .iter()
            .any(|p| p.to_string_lossy().contains("v4.0.30319")));
        assert!(candidates
            .iter()
            .any(|p| p.to_string_lossy().contains("Framework64")));
    }

    #[test]
    fn test_detect_never_panics() {
        let ctx = GlobalContext::new().unwrap();
        let set = BackendSet::detect(&ctx);
        // On most CI machines neither tool exists; the probe must simply
        // report absence.
        let _ = set.is_empty();
    }
}
