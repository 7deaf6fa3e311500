//! Configuration file support for implreg.
//!
//! implreg reads two configuration file locations:
//! - Global: `~/.implreg/config.toml` - User-wide defaults
//! - Project: `.implreg/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the per-user and per-project configuration directory.
pub const CONFIG_DIR: &str = ".implreg";

/// implreg configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fragment rendering settings
    pub render: RenderConfig,

    /// Replay settings
    pub replay: ReplayConfig,
}

/// Fragment rendering configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Write the segment offset trailer (default: true)
    pub emit_offsets: Option<bool>,
}

/// Replay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Install the sink after this many fragments (None = after all)
    pub install_after: Option<usize>,

    /// Libraries whose implementors the page renders itself
    pub local_libraries: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.render.emit_offsets.is_some() {
            self.render.emit_offsets = other.render.emit_offsets;
        }

        if other.replay.install_after.is_some() {
            self.replay.install_after = other.replay.install_after;
        }
        if !other.replay.local_libraries.is_empty() {
            self.replay.local_libraries = other.replay.local_libraries;
        }
    }

    /// Whether rendered fragments carry the offset trailer.
    pub fn emit_offsets(&self) -> bool {
        self.render.emit_offsets.unwrap_or(true)
    }
}

/// Get the global config directory (~/.implreg).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// Get the global config path (~/.implreg/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.implreg/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.implreg/config.toml)
/// 2. Global config (~/.implreg/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    // Project config overrides global
    config.merge(Config::load_or_default(project_path));

    config
}

/// Load the configuration that applies to `cwd`.
pub fn load_for_cwd(cwd: &Path) -> Config {
    let global = global_config_path();
    load_config(global.as_deref(), &project_config_path(cwd))
}
