//! Chat model providers for Secret Agent.
//!
//! Secret generation is delegated to a hosted chat model. This crate wraps
//! the non-streaming chat endpoints of:
//! - Anthropic (Claude models)
//! - OpenAI (GPT models, or any OpenAI-compatible server)
//! - Google (Gemini models)
//!
//! # Example
//!
//! ```rust,ignore
//! use secretagent_providers::{Provider, OpenAIProvider, Message, ChatOptions};
//!
//! let provider = OpenAIProvider::new("your-api-key")?.with_timeout(30)?;
//! let response = provider
//!     .chat(
//!         provider.default_model(),
//!         &[Message::user("Generate a 16 character password.")],
//!         Some(ChatOptions::json()),
//!     )
//!     .await?;
//! println!("{}", response.content);
//! ```

mod error;
mod http;
mod types;

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "google")]
pub mod google;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicProvider;
#[cfg(feature = "google")]
pub use google::GoogleProvider;
#[cfg(feature = "openai")]
pub use openai::OpenAIProvider;

pub use error::{ProviderError, Result};
pub use http::DEFAULT_TIMEOUT_SECS;
pub use types::*;

use async_trait::async_trait;

/// A model provider that can answer a chat completion request.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get provider name.
    fn name(&self) -> &str;

    /// Model used when the caller does not pick one.
    fn default_model(&self) -> &str;

    /// Generate a chat completion.
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<ChatOptions>,
    ) -> Result<ChatResponse>;

    /// Get model capabilities.
    fn capabilities(&self) -> ProviderCapabilities;
}

/// Provider capabilities.
#[derive(Debug, Clone, Default)]
pub struct ProviderCapabilities {
    /// Supports a JSON-only response mode.
    pub json_mode: bool,

    /// Supports system messages.
    pub system_messages: bool,

    /// Maximum output tokens.
    pub max_output: Option<usize>,
}
