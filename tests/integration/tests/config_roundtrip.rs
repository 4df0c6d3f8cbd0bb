//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration written by one process is read back
//! with identical values and still drives the storage and generation crates.

use secretagent_core::config::{
    Config, ConfigBuilder, GenerationProvider, LogFormat, LogLevel, StorageBackend,
};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secretagent.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.storage.key, config.storage.key);
    assert_eq!(loaded.storage.backend, config.storage.backend);
    assert_eq!(loaded.generation.provider, config.generation.provider);
    assert_eq!(loaded.generation.timeout_secs, config.generation.timeout_secs);
    assert_eq!(loaded.logging.level, config.logging.level);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secretagent.json5");

    let mut config = ConfigBuilder::new()
        .provider(GenerationProvider::Anthropic)
        .model("claude-3-5-haiku-20241022")
        .storage_key("vault")
        .log_level(LogLevel::Debug)
        .build();
    config.logging.format = LogFormat::Json;
    config.generation.timeout_secs = 15;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.generation.provider, GenerationProvider::Anthropic);
    assert_eq!(
        loaded.generation.model.as_deref(),
        Some("claude-3-5-haiku-20241022")
    );
    assert_eq!(loaded.generation.timeout_secs, 15);
    assert_eq!(loaded.storage.key, "vault");
    assert_eq!(loaded.logging.level, LogLevel::Debug);
    assert_eq!(loaded.logging.format, LogFormat::Json);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_hand_written_json5() {
    let config = Config::parse(
        r#"{
            // keep everything in memory
            storage: { backend: 'memory', key: 'scratch' },
            generation: { provider: 'google', api_key_env: 'MY_GEMINI_KEY', },
        }"#,
    )
    .unwrap();

    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.storage.key, "scratch");
    assert_eq!(config.generation.api_key_var(), Some("MY_GEMINI_KEY"));
    assert_eq!(config.generation.timeout_secs, 60);
}

#[test]
fn test_unknown_provider_rejected_at_parse() {
    assert!(Config::parse("{ generation: { provider: 'cohere' } }").is_err());
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/secretagent.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
