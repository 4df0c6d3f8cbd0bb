//! HTTP plumbing shared by the providers.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::{ProviderError, Result};

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Build the HTTP client for a provider.
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::config(format!("Failed to create HTTP client: {}", e)))
}

/// Map a transport error, reporting timeouts as such.
pub(crate) fn send_error(err: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(timeout_secs)
    } else {
        ProviderError::Network(err.without_url())
    }
}

/// Map a non-success HTTP status and the provider's error message.
pub(crate) fn status_error(status: StatusCode, message: String, model: &str) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::auth(message),
        404 => ProviderError::model_not_found(format!("{model}: {message}")),
        429 => ProviderError::rate_limit(message, None),
        400 => ProviderError::invalid_request(message),
        code => ProviderError::server_error(code, message),
    }
}
