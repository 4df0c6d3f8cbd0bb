//! Canned generator for tests and demos.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use secretagent_core::{ApiKeyCriteria, PasswordCriteria};
use secretagent_providers::ProviderError;

use crate::generator::{ApiKeyResponse, PasswordResponse, SecretGenerator};
use crate::{GenerationError, Result};

/// Generator returning fixed values.
///
/// Records the criteria it was called with and can be told to fail the next
/// `n` calls or to answer after a delay.
pub struct FixedGenerator {
    password: String,
    api_key: String,
    comments: Option<String>,
    delay: Option<Duration>,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
    last_password: Mutex<Option<PasswordCriteria>>,
    last_api_key: Mutex<Option<ApiKeyCriteria>>,
}

impl FixedGenerator {
    pub fn new(password: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            api_key: api_key.into(),
            comments: None,
            delay: None,
            failures_left: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            last_password: Mutex::new(None),
            last_api_key: Mutex::new(None),
        }
    }

    /// Comments returned with every API key.
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    /// Wait this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the next `n` calls with a retryable provider error.
    pub fn failing(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// Number of calls received, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_password_criteria(&self) -> Option<PasswordCriteria> {
        *self.last_password.lock()
    }

    pub fn last_api_key_criteria(&self) -> Option<ApiKeyCriteria> {
        self.last_api_key.lock().clone()
    }

    async fn answer(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(GenerationError::Provider(ProviderError::server_error(
                503,
                "generator unavailable",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SecretGenerator for FixedGenerator {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn generate_password(&self, criteria: &PasswordCriteria) -> Result<PasswordResponse> {
        *self.last_password.lock() = Some(*criteria);
        self.answer().await?;
        Ok(PasswordResponse {
            password: self.password.clone().into(),
        })
    }

    async fn suggest_api_key(&self, criteria: &ApiKeyCriteria) -> Result<ApiKeyResponse> {
        *self.last_api_key.lock() = Some(criteria.clone());
        self.answer().await?;
        Ok(ApiKeyResponse {
            api_key: self.api_key.clone().into(),
            comments: self.comments.clone(),
        })
    }
}
