//! Command implementations

pub mod completions;
pub mod inspect;
pub mod merge;
pub mod render;
pub mod replay;
pub mod scan;

use anyhow::{Context, Result};

use implreg::util::config::{load_for_cwd, Config};

/// Load the configuration for the current directory.
pub fn load_config() -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    Ok(load_for_cwd(&cwd))
}
