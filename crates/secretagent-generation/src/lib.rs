//! Secret generation for Secret Agent.
//!
//! - [`SecretGenerator`]: the two-operation contract (password, API key)
//! - [`LlmGenerator`]: asks a chat model provider
//! - [`LocalGenerator`]: random generation without network access
//! - [`FixedGenerator`]: canned answers for tests
//! - [`SecretDraft`]: validate, generate, then save into the repository

mod draft;
mod error;
mod fixed;
mod generator;
mod llm;
mod local;

pub use draft::{GeneratedSecret, SecretDraft};
pub use error::{GenerationError, Result};
pub use fixed::FixedGenerator;
pub use generator::{ApiKeyResponse, PasswordResponse, SecretGenerator};
pub use llm::LlmGenerator;
pub use local::LocalGenerator;

use secretagent_core::config::{GenerationConfig, GenerationProvider};
use secretagent_providers::{AnthropicProvider, GoogleProvider, OpenAIProvider, Provider};
use tracing::debug;

/// Build the generator described by the `generation` config section.
///
/// Hosted providers read their API key from the configured environment
/// variable.
pub fn from_config(config: &GenerationConfig) -> Result<Box<dyn SecretGenerator>> {
    debug!(provider = config.provider.as_str(), "building secret generator");

    let generator: Box<dyn SecretGenerator> = match config.provider {
        GenerationProvider::Local => Box::new(LocalGenerator::new()),
        GenerationProvider::OpenAI => {
            let mut provider =
                OpenAIProvider::new(api_key(config)?)?.with_timeout(config.timeout_secs)?;
            if let Some(base) = &config.api_base {
                provider = provider.with_base_url(base);
            }
            Box::new(llm(provider, config))
        }
        GenerationProvider::Anthropic => {
            let mut provider =
                AnthropicProvider::new(api_key(config)?)?.with_timeout(config.timeout_secs)?;
            if let Some(base) = &config.api_base {
                provider = provider.with_base_url(base);
            }
            Box::new(llm(provider, config))
        }
        GenerationProvider::Google => {
            let mut provider =
                GoogleProvider::new(api_key(config)?)?.with_timeout(config.timeout_secs)?;
            if let Some(base) = &config.api_base {
                provider = provider.with_base_url(base);
            }
            Box::new(llm(provider, config))
        }
    };

    Ok(generator)
}

fn llm<P: Provider>(provider: P, config: &GenerationConfig) -> LlmGenerator<P> {
    let generator = LlmGenerator::new(provider);
    match &config.model {
        Some(model) => generator.with_model(model),
        None => generator,
    }
}

fn api_key(config: &GenerationConfig) -> Result<String> {
    let var = config.api_key_var().ok_or_else(|| {
        GenerationError::config(format!(
            "no API key variable for provider '{}'",
            config.provider.as_str()
        ))
    })?;

    match std::env::var(var) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(GenerationError::config(format!(
            "{var} environment variable not set"
        ))),
    }
}
