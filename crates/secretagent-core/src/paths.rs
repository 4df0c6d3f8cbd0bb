//! Path resolution utilities.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the Secret Agent base directory (~/.secretagent).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".secretagent"))
}

/// Get the main config file path (~/.secretagent/secretagent.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("secretagent.json5"))
}

/// Get the key-value storage directory (~/.secretagent/storage).
pub fn storage_dir() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("storage"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
