//! Configuration file support for csforge.
//!
//! Two locations are supported:
//! - Global: `~/.csforge/config.toml` - user-wide defaults
//! - Project: `.csforge/config.toml` - per-directory overrides
//!
//! Project config takes precedence over global config, and CLI flags
//! override both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::backend::BackendPreference;

/// csforge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// SDK provisioning settings
    pub install: InstallConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Default backend preference (auto, csc, dotnet)
    pub backend: Option<String>,

    /// Base target framework moniker (defaults to net8.0)
    pub target_framework: Option<String>,

    /// Publish self-contained output by default
    pub self_contained: Option<bool>,

    /// Publish single-file output by default
    pub single_file: Option<bool>,
}

/// SDK provisioning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Release channel passed to the scripted installer
    pub channel: String,

    /// Never attempt provisioning (fail terminally instead)
    #[serde(default)]
    pub offline: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        InstallConfig {
            channel: "LTS".to_string(),
            offline: false,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.backend.is_some() {
            self.build.backend = other.build.backend;
        }
        if other.build.target_framework.is_some() {
            self.build.target_framework = other.build.target_framework;
        }
        if other.build.self_contained.is_some() {
            self.build.self_contained = other.build.self_contained;
        }
        if other.build.single_file.is_some() {
            self.build.single_file = other.build.single_file;
        }

        if other.install.channel != InstallConfig::default().channel {
            self.install.channel = other.install.channel;
        }
        if other.install.offline {
            self.install.offline = true;
        }
    }

    /// Parse the backend preference from the config string.
    pub fn backend(&self) -> Option<BackendPreference> {
        self.build.backend.as_ref().and_then(|s| s.parse().ok())
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.csforge/config.toml)
/// 2. Global config (~/.csforge/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global csforge config directory (~/.csforge).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".csforge"))
}
