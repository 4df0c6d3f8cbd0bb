//! Configuration loading and persistence.

use super::{Config, GenerationProvider, LogLevel, StorageBackend};
use crate::error::ConfigError;
use crate::{id, paths};
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load from `path` (or the default path), using defaults when the file
    /// does not exist. Parse errors are still reported.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => paths::config_file()?,
        };

        match Self::load(&path) {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 has no serializer; plain JSON is valid JSON5.
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Directory the file backend writes to.
    pub fn storage_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.dir {
            Some(dir) => Ok(paths::expand_tilde(&dir.to_string_lossy())),
            None => paths::storage_dir(),
        }
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.storage.key.is_empty() {
            errors.push("Storage key must not be empty".to_string());
        } else if !id::is_valid_key(&self.storage.key) {
            errors.push(format!(
                "Invalid storage key '{}' (allowed: alphanumeric, underscore, hyphen; max {} characters)",
                self.storage.key,
                id::MAX_KEY_LEN
            ));
        }

        if self.generation.timeout_secs == 0 {
            errors.push("Generation timeout must be greater than 0".to_string());
        }

        if let Some(base) = &self.generation.api_base {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                errors.push(format!(
                    "Invalid api_base '{}', expected an http(s) URL",
                    base
                ));
            }
            if self.generation.provider == GenerationProvider::Local {
                errors.push("api_base is set but the local provider makes no requests".to_string());
            }
        }

        if let Some(var) = &self.generation.api_key_env {
            if var.is_empty() {
                errors.push("api_key_env must not be empty".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}

/// Configuration builder for creating configs programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage backend.
    pub fn storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage.backend = backend;
        self
    }

    /// Set the storage directory.
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.storage.dir = Some(dir.into());
        self
    }

    /// Set the storage key.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage.key = key.into();
        self
    }

    /// Set the generation provider.
    pub fn provider(mut self, provider: GenerationProvider) -> Self {
        self.config.generation.provider = provider;
        self
    }

    /// Set the generation model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = Some(model.into());
        self
    }

    /// Set the provider API base URL.
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.config.generation.api_base = Some(url.into());
        self
    }

    /// Set the environment variable holding the provider API key.
    pub fn api_key_env(mut self, var: impl Into<String>) -> Self {
        self.config.generation.api_key_env = Some(var.into());
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate the configuration.
    pub fn build_validated(self) -> Result<Config, ConfigError> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}
