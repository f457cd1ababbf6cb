//! Global context for csforge operations.
//!
//! Provides centralized access to paths and environment: the invocation
//! directory, the user-wide home directory for provisioned tools, the
//! per-directory logs location, and config file paths.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::util::logs::LogDir;

/// Project directories for csforge
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "csforge", "csforge"));

/// Global context containing paths and environment.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global csforge data (~/.csforge/)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = if let Some(dirs) = PROJECT_DIRS.as_ref() {
            dirs.cache_dir().to_path_buf()
        } else {
            // Fallback to ~/.csforge
            crate::util::config::global_config_dir()
                .unwrap_or_else(|| PathBuf::from(".csforge"))
        };

        Ok(GlobalContext { cwd, home })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the csforge home directory (~/.csforge/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project-local csforge directory.
    pub fn project_dir(&self) -> PathBuf {
        self.cwd.join(".csforge")
    }

    /// Get the project-local configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.project_dir().join("config.toml")
    }

    /// Get the logs directory for this invocation.
    pub fn log_dir(&self) -> LogDir {
        LogDir::new(self.project_dir().join("logs"))
    }

    /// Get the directory for provisioned tools (~/.csforge/tools).
    pub fn tools_dir(&self) -> PathBuf {
        self.home.join("tools")
    }

    /// Get the install directory for a locally provisioned SDK.
    pub fn local_sdk_dir(&self) -> PathBuf {
        self.tools_dir().join("dotnet")
    }

    /// Get the path a locally provisioned `dotnet` binary would have.
    pub fn local_dotnet(&self) -> PathBuf {
        let name = if cfg!(windows) { "dotnet.exe" } else { "dotnet" };
        self.local_sdk_dir().join(name)
    }
}

impl Default for GlobalContext {
    fn default() -> Self {
        Self::new().expect("failed to create default GlobalContext")
    }
}
