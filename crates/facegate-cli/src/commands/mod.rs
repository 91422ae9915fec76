//! CLI command implementations.

pub mod config;
pub mod identities;
pub mod roles;
pub mod run;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use facegate_config::FacegateConfig;

/// Loads configuration for `project_dir`, resolving `store` against it when given.
pub(crate) fn load_config(project_dir: &Path, store: Option<PathBuf>) -> Result<FacegateConfig> {
    let mut config =
        FacegateConfig::load_from_dir(project_dir).context("Failed to load configuration")?;
    if let Some(store) = store {
        config.store.path = store;
        config.resolve_paths(project_dir);
    }
    Ok(config)
}
