//! The secret generator contract.

use async_trait::async_trait;
use secretagent_core::{ApiKeyCriteria, PasswordCriteria, SecretString};
use serde::{Deserialize, Serialize};

use crate::Result;

/// A generated password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResponse {
    pub password: SecretString,
}

/// A suggested API key with optional notes on its use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub api_key: SecretString,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// A service that turns generation criteria into secrets.
///
/// Output is taken as-is: callers do not check that a password honours the
/// requested length or character classes.
#[async_trait]
pub trait SecretGenerator: Send + Sync {
    /// Generator name, for logs.
    fn name(&self) -> &str;

    /// Generate a password matching `criteria`.
    async fn generate_password(&self, criteria: &PasswordCriteria) -> Result<PasswordResponse>;

    /// Suggest an API key for the described service.
    async fn suggest_api_key(&self, criteria: &ApiKeyCriteria) -> Result<ApiKeyResponse>;
}
