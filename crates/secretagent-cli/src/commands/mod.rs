//! CLI command implementations.

pub mod add;
pub mod config;
pub mod delete;
pub mod list;
pub mod show;

use anyhow::Context;
use secretagent_core::config::Config;
use secretagent_core::paths;
use secretagent_storage::SecretRepository;
use std::path::{Path, PathBuf};

/// Config file in use: `--config` when given, the default path otherwise.
pub fn config_path(path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(paths::config_file()?),
    }
}

/// Load and validate the configuration. A missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = config_path(path)?;
    let config = Config::load_or_default(Some(&path))
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Open the secret repository described by the config.
pub fn open_repository(config: &Config) -> anyhow::Result<SecretRepository> {
    secretagent_storage::open_repository(config)
        .map_err(|e| anyhow::anyhow!("Failed to open secret storage: {}", e))
}
