//! OpenAI GPT provider implementation.
//!
//! Talks to the `/chat/completions` endpoint, so any OpenAI-compatible
//! server can be used by overriding the base URL.

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

/// Default OpenAI API base URL.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI GPT provider.
pub struct OpenAIProvider {
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

impl OpenAIProvider {
    /// Create a new OpenAI provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ProviderError::config("API key is required"));
        }

        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT_SECS)?,
            api_key: SecretString::new(api_key),
            api_base: DEFAULT_API_BASE.to_string(),
            default_model: "gpt-4o".to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Set the API base URL (for Azure OpenAI or compatible APIs).
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

    /// Convert messages to OpenAI format.
    fn convert_messages(&self, messages: &[Message]) -> Vec<OpenAIMessage> {
        messages
            .iter()
            .map(|msg| OpenAIMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: Some(msg.content.clone()),
            })
            .collect()
    }

    /// Parse OpenAI response.
    fn parse_response(&self, response: OpenAIResponse) -> Result<ChatResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::internal("No choices in response"))?;

        let stop_reason = match choice.finish_reason.as_deref() {
            Some("stop") => StopReason::EndTurn,
            Some("length") => StopReason::MaxTokens,
            Some("content_filter") => StopReason::ContentFilter,
            _ => StopReason::Unknown,
        };

        let usage = response.usage.unwrap_or_default();

        Ok(ChatResponse {
            id: response.id,
            model: response.model,
            content: choice.message.content.unwrap_or_default(),
            stop_reason,
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
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

        let request = OpenAIRequest {
            model: model.to_string(),
            messages: self.convert_messages(messages),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            stop: options.stop,
            response_format: options.json_response.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        };

        debug!(model, "sending request to OpenAI");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<OpenAIError>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, message, model));
        }

        let response: OpenAIResponse = response.json().await?;
        self.parse_response(response)
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            json_mode: true,
            system_messages: true,
            max_output: Some(16_384),
        }
    }
}

// Internal types for OpenAI API

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

#[derive(Deserialize)]
struct OpenAIError {
    error: OpenAIErrorDetail,
}

#[derive(Deserialize)]
struct OpenAIErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-123",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 42, "completion_tokens": 7}
        })
    }

    #[test]
    fn test_provider_creation() {
        let provider = OpenAIProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), "gpt-4o");
    }

    #[test]
    fn test_provider_empty_key() {
        let result = OpenAIProvider::new("");
        assert!(result.is_err());
    }

    #[test]
    fn test_capabilities() {
        let provider = OpenAIProvider::new("test-key").unwrap();
        let caps = provider.capabilities();

        assert!(caps.json_mode);
        assert!(caps.system_messages);
    }

    #[tokio::test]
    async fn test_chat_roundtrip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "gpt-4o",
                "response_format": {"type": "json_object"},
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"password":"x"}"#)))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        let response = provider
            .chat("gpt-4o", &[Message::user("hi")], Some(ChatOptions::json()))
            .await
            .unwrap();

        assert_eq!(response.content, r#"{"password":"x"}"#);
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.total_tokens(), 49);
    }

    #[tokio::test]
    async fn test_chat_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new("bad-key")
            .unwrap()
            .with_base_url(server.uri());
        let err = provider
            .chat("gpt-4o", &[Message::user("hi")], None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Authentication(ref m) if m.contains("Incorrect")));
    }

    #[tokio::test]
    async fn test_chat_server_error_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        let err = provider
            .chat("gpt-4o", &[Message::user("hi")], None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::ServerError { status: 502, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_chat_no_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "x", "model": "gpt-4o", "choices": []
            })))
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new("test-key")
            .unwrap()
            .with_base_url(server.uri());
        let err = provider
            .chat("gpt-4o", &[Message::user("hi")], None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Internal(_)));
    }

    #[tokio::test]
    async fn test_chat_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("late"))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new("test-key")
            .unwrap()
            .with_base_url(server.uri())
            .with_timeout(1)
            .unwrap();
        let err = provider
            .chat("gpt-4o", &[Message::user("hi")], None)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Timeout(1)));
    }
}
