//! Anthropic Claude provider implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use secretagent_providers::{AnthropicProvider, Message, Provider};
//!
//! let provider = AnthropicProvider::new("your-api-key")?;
//! let response = provider.chat(
//!     "claude-sonnet-4-20250514",
//!     &[Message::user("Suggest an API key for a billing service.")],
//!     None,
//! ).await?;
//! ```

use crate::http::{build_client, send_error, status_error, DEFAULT_TIMEOUT_SECS};
use crate::{
    ChatOptions, ChatResponse, Message, MessageRole, Provider, ProviderCapabilities,
    ProviderError, Result, StopReason, Usage,
};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default Anthropic API base URL.
const DEFAULT_API_BASE: &str = "https://api.anthropic.com";

/// Current API version.
const API_VERSION: &str = "2023-06-01";

/// Output cap when the caller sets none; the API requires one.
const DEFAULT_MAX_TOKENS: usize = 1024;

/// Anthropic Claude provider.
pub struct AnthropicProvider {
    /// HTTP client.
    client: Client,

    /// API key.
    api_key: SecretString,

    /// API base URL.
    api_base: String,

    /// Default model to use.
    default_model: String,

    /// Request timeout in seconds.
    timeout: u64,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ProviderError::config("API key is required"));
        }

        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT_SECS)?,
            api_key: SecretString::new(api_key),
            api_base: DEFAULT_API_BASE.to_string(),
            default_model: "claude-sonnet-4-20250514".to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Result<Self> {
        self.client = build_client(seconds)?;
        self.timeout = seconds;
        Ok(self)
    }

    /// Split off the system prompt; Anthropic takes it as a separate field.
    fn convert_messages(&self, messages: &[Message]) -> (Option<String>, Vec<AnthropicMessage>) {
        let mut system: Vec<&str> = Vec::new();
        let mut converted = Vec::new();

        for msg in messages {
            match msg.role {
                MessageRole::System => system.push(&msg.content),
                MessageRole::User => converted.push(AnthropicMessage {
                    role: "user".to_string(),
                    content: msg.content.clone(),
                }),
                MessageRole::Assistant => converted.push(AnthropicMessage {
                    role: "assistant".to_string(),
                    content: msg.content.clone(),
                }),
            }
        }

        let system = (!system.is_empty()).then(|| system.join("\n\n"));
        (system, converted)
    }

    /// Parse Anthropic response.
    fn parse_response(&self, response: AnthropicResponse) -> ChatResponse {
        let content: String = response
            .content
            .iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text.as_str()),
                AnthropicContentBlock::Other => None,
            })
            .collect();

        let stop_reason = match response.stop_reason.as_deref() {
            Some("end_turn") => StopReason::EndTurn,
            Some("stop_sequence") => StopReason::StopSequence,
            Some("max_tokens") => StopReason::MaxTokens,
            _ => StopReason::Unknown,
        };

        ChatResponse {
            id: response.id,
            model: response.model,
            content,
            stop_reason,
            usage: Usage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
        }
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<ChatOptions>,
    ) -> Result<ChatResponse> {
        let options = options.unwrap_or_default();
        let (system, converted_messages) = self.convert_messages(messages);

        let request = AnthropicRequest {
            model: model.to_string(),
            messages: converted_messages,
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system,
            temperature: options.temperature,
            stop_sequences: options.stop,
        };

        debug!(model, "sending request to Anthropic");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_base))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<AnthropicError>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, message, model));
        }

        let response: AnthropicResponse = response.json().await?;
        Ok(self.parse_response(response))
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            json_mode: false,
            system_messages: true,
            max_output: Some(64_000),
        }
    }
}

// Internal types for Anthropic API

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    id: String,
    model: String,
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: usize,
    output_tokens: usize,
}

#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_provider_creation() {
        let provider = AnthropicProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "anthropic");
        assert_eq!(provider.default_model(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_provider_empty_key() {
        let result = AnthropicProvider::new("");
        assert!(result.is_err());
    }

    #[test]
    fn test_capabilities() {
        let provider = AnthropicProvider::new("test-key").unwrap();
        let caps = provider.capabilities();

        assert!(!caps.json_mode);
        assert!(caps.system_messages);
    }

    #[test]
    fn test_system_prompt_split() {
        let provider = AnthropicProvider::new("test-key").unwrap();
        let (system, messages) = provider.convert_messages(&[
            Message::system("You are a password expert."),
            Message::user("Length: 16"),
        ]);

        assert_eq!(system.as_deref(), Some("You are a password expert."));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }

    #[tokio::test]
    async fn test_chat_roundtrip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", API_VERSION))
            .and(body_partial_json(json!({
                "model": "claude-sonnet-4-20250514",
                "system": "be terse",
                "max_tokens": DEFAULT_MAX_TOKENS
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "model": "claude-sonnet-4-20250514",
                "content": [
                    {"type": "text", "text": "{\"apiKey\":"},
                    {"type": "text", "text": "\"sk_test\"}"}
                ],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 20, "output_tokens": 8}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        let response = provider
            .chat(
                "claude-sonnet-4-20250514",
                &[Message::system("be terse"), Message::user("hi")],
                None,
            )
            .await
            .unwrap();

        assert_eq!(response.content, r#"{"apiKey":"sk_test"}"#);
        assert_eq!(response.id, "msg_01");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
    }

    #[tokio::test]
    async fn test_chat_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "type": "error",
                "error": {"type": "rate_limit_error", "message": "Too many requests"}
            })))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        let err = provider
            .chat("claude-sonnet-4-20250514", &[Message::user("hi")], None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::RateLimit { .. }));
    }
}
