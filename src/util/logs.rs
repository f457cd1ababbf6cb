//! Per-phase log files for raw external-process output.
//!
//! Every external invocation (compiler install, installer download, SDK
//! install, legacy compile, modern publish) gets its own file under the
//! logs directory. Files are overwritten on each run of the same phase,
//! never appended.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs::{ensure_dir, write_string};

/// The phases that produce a raw log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// winget-based compiler/SDK install
    CompilerInstall,
    /// download of the SDK installer script
    Download,
    /// scripted SDK install
    SdkInstall,
    /// csc.exe compilation
    LegacyCompile,
    /// dotnet publish
    ModernPublish,
}

impl Phase {
    /// The log file name for this phase.
    pub fn file_name(&self) -> &'static str {
        match self {
            Phase::CompilerInstall => "winget_install.log",
            Phase::Download => "dotnet_install_download.log",
            Phase::SdkInstall => "dotnet_install.log",
            Phase::LegacyCompile => "csc_compile.log",
            Phase::ModernPublish => "dotnet_publish.log",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::CompilerInstall => "compiler-install",
            Phase::Download => "download",
            Phase::SdkInstall => "sdk-install",
            Phase::LegacyCompile => "legacy-compile",
            Phase::ModernPublish => "modern-publish",
        };
        write!(f, "{}", name)
    }
}

/// Handle to the logs directory.
#[derive(Debug, Clone)]
pub struct LogDir {
    root: PathBuf,
}

impl LogDir {
    /// Create a handle rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LogDir { root: root.into() }
    }

    /// The directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist a phase's raw transcript, overwriting any previous run.
    /// Returns the path written.
    pub fn write_phase(&self, phase: Phase, transcript: &str) -> Result<PathBuf> {
        ensure_dir(&self.root)?;
        let path = self.root.join(phase.file_name());
        write_string(&path, transcript)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_phase_file_names() {
        assert_eq!(Phase::LegacyCompile.file_name(), "csc_compile.log");
        assert_eq!(Phase::ModernPublish.file_name(), "dotnet_publish.log");
    }

    #[test]
    fn test_write_phase_creates_dir() {
        let tmp = TempDir::new().unwrap();
        let logs = LogDir::new(tmp.path().join("logs"));

        let path = logs.write_phase(Phase::LegacyCompile, "first run\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first run\n");
    }

    #[test]
    fn test_write_phase_overwrites() {
        let tmp = TempDir::new().unwrap();
        let logs = LogDir::new(tmp.path().join("logs"));

        logs.write_phase(Phase::ModernPublish, "first\n").unwrap();
        let path = logs.write_phase(Phase::ModernPublish, "second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::SdkInstall.to_string(), "sdk-install");
        assert_eq!(Phase::Download.to_string(), "download");
    }
}
