//! Secret generation through a hosted chat model.

use async_trait::async_trait;
use secretagent_core::{ApiKeyCriteria, PasswordCriteria};
use secretagent_providers::{ChatOptions, Message, Provider};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::generator::{ApiKeyResponse, PasswordResponse, SecretGenerator};
use crate::{GenerationError, Result};

/// Output cap for a single generation reply.
const MAX_REPLY_TOKENS: usize = 512;

const PASSWORD_SCHEMA: &str = r#"Reply with a single JSON object and nothing else, in the form {"password": "<the generated password>"}."#;

const API_KEY_SCHEMA: &str = r#"Reply with a single JSON object and nothing else, in the form {"apiKey": "<the suggested API key>", "comments": "<optional notes on the key and its usage>"}."#;

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn password_prompt(criteria: &PasswordCriteria) -> String {
    format!(
        "You are a password expert, skilled at generating strong and unique passwords.\n\n\
         Based on the following criteria, generate a password. The password should be random and difficult to guess.\n\n\
         Length: {}\n\
         Include Numbers: {}\n\
         Include Symbols: {}\n\n\
         Ensure that the password meets the specified criteria and is suitable for securing sensitive accounts.\n\n\
         Respond with ONLY the generated password.",
        criteria.length,
        yes_no(criteria.include_numbers),
        yes_no(criteria.include_symbols),
    )
}

fn api_key_prompt(criteria: &ApiKeyCriteria) -> String {
    format!(
        "You are an API key generation expert. You will be given a description of a service and the access level required for the API key.\n\n\
         Based on this information, you will generate a secure, unique API key and return it. \
         Also return any relevant comments about the key or its usage, particularly security considerations.\n\n\
         Service Description: {}\n\
         Access Level: {}",
        criteria.service_description, criteria.access_level,
    )
}

/// Strip a Markdown code fence, if the whole reply is wrapped in one.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

/// Parse the first JSON object embedded in a model reply.
fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T> {
    let body = strip_code_fence(text);
    let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
        return Err(GenerationError::malformed("reply contains no JSON object"));
    };
    if end < start {
        return Err(GenerationError::malformed("reply contains no JSON object"));
    }

    serde_json::from_str(&body[start..=end])
        .map_err(|e| GenerationError::malformed(format!("unexpected reply shape: {e}")))
}

/// Parse a password reply: the JSON form, or a bare single-token line.
fn parse_password_reply(text: &str) -> Result<PasswordResponse> {
    let body = strip_code_fence(text);
    let response = if body.starts_with('{') {
        parse_json_reply::<PasswordResponse>(body)?
    } else if !body.is_empty() && !body.contains(char::is_whitespace) {
        PasswordResponse {
            password: body.into(),
        }
    } else {
        return Err(GenerationError::malformed("reply is not a single password"));
    };

    if response.password.is_empty() {
        return Err(GenerationError::malformed("empty password"));
    }
    Ok(response)
}

fn parse_api_key_reply(text: &str) -> Result<ApiKeyResponse> {
    let mut response = parse_json_reply::<ApiKeyResponse>(text)?;
    if response.api_key.is_empty() {
        return Err(GenerationError::malformed("empty API key"));
    }
    if response.comments.as_deref().is_some_and(|c| c.trim().is_empty()) {
        response.comments = None;
    }
    Ok(response)
}

/// Generator backed by a chat model provider.
pub struct LlmGenerator<P: Provider> {
    provider: P,
    model: String,
}

impl<P: Provider> LlmGenerator<P> {
    /// Generator using the provider's default model.
    pub fn new(provider: P) -> Self {
        let model = provider.default_model().to_string();
        Self { provider, model }
    }

    /// Use a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn ask(&self, schema: &str, prompt: String) -> Result<String> {
        let mut options = ChatOptions::with_max_tokens(MAX_REPLY_TOKENS);
        options.json_response = self.provider.capabilities().json_mode;

        let messages = [Message::system(schema), Message::user(prompt)];

        debug!(provider = self.provider.name(), model = %self.model, "requesting generation");
        let response = self
            .provider
            .chat(&self.model, &messages, Some(options))
            .await
            .map_err(|e| {
                warn!(provider = self.provider.name(), error = %e, "generation request failed");
                GenerationError::from(e)
            })?;

        debug!(
            provider = self.provider.name(),
            output_tokens = response.usage.output_tokens,
            "generation reply received"
        );
        Ok(response.content)
    }
}

#[async_trait]
impl<P: Provider> SecretGenerator for LlmGenerator<P> {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn generate_password(&self, criteria: &PasswordCriteria) -> Result<PasswordResponse> {
        let reply = self.ask(PASSWORD_SCHEMA, password_prompt(criteria)).await?;
        parse_password_reply(&reply)
    }

    async fn suggest_api_key(&self, criteria: &ApiKeyCriteria) -> Result<ApiKeyResponse> {
        let reply = self.ask(API_KEY_SCHEMA, api_key_prompt(criteria)).await?;
        parse_api_key_reply(&reply)
    }
}
