//! The add-secret pipeline.
//!
//! A [`SecretDraft`] holds the form state for one secret: its name, the
//! criteria to generate it from, and the last generated value. Generating
//! and saving are separate steps; nothing reaches the repository until
//! [`SecretDraft::save`] is called after a successful generation.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use secretagent_core::validation::validate_form;
use secretagent_core::{
    ApiKeyCriteria, NewSecret, PasswordCriteria, SecretCriteria, SecretKind, SecretRecord,
    SecretString,
};
use secretagent_storage::SecretRepository;
use tracing::{debug, info, warn};

use crate::generator::SecretGenerator;
use crate::{GenerationError, Result};

/// Value produced by the last successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSecret {
    pub value: SecretString,

    /// Notes returned with an API key. Shown to the user, not stored.
    pub comments: Option<String>,
}

#[derive(Debug)]
struct DraftState {
    name: String,
    criteria: SecretCriteria,
    generated: Option<GeneratedSecret>,
}

/// Holds the in-flight flag for the lifetime of one generation call.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Form state for a secret that has not been saved yet.
///
/// Safe to share between tasks; at most one generation runs at a time.
#[derive(Debug)]
pub struct SecretDraft {
    state: Mutex<DraftState>,
    busy: AtomicBool,
}

impl SecretDraft {
    pub fn new(name: impl Into<String>, criteria: impl Into<SecretCriteria>) -> Self {
        Self {
            state: Mutex::new(DraftState {
                name: name.into(),
                criteria: criteria.into(),
                generated: None,
            }),
            busy: AtomicBool::new(false),
        }
    }

    /// Draft for a password with default criteria.
    pub fn password(name: impl Into<String>) -> Self {
        Self::new(name, PasswordCriteria::default())
    }

    /// Draft for an API key with empty criteria.
    pub fn api_key(name: impl Into<String>) -> Self {
        Self::new(name, ApiKeyCriteria::default())
    }

    pub fn name(&self) -> String {
        self.state.lock().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.state.lock().name = name.into();
    }

    pub fn criteria(&self) -> SecretCriteria {
        self.state.lock().criteria.clone()
    }

    pub fn set_criteria(&self, criteria: impl Into<SecretCriteria>) {
        self.state.lock().criteria = criteria.into();
    }

    pub fn kind(&self) -> SecretKind {
        self.state.lock().criteria.kind()
    }

    /// The last generated value, if any.
    pub fn generated(&self) -> Option<GeneratedSecret> {
        self.state.lock().generated.clone()
    }

    /// Whether a generation request is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Validate the form and ask `generator` for a value.
    ///
    /// Any previously generated value is discarded first. On failure the
    /// name and criteria are kept so the request can be re-submitted.
    pub async fn generate(&self, generator: &dyn SecretGenerator) -> Result<GeneratedSecret> {
        let (name, criteria) = {
            let state = self.state.lock();
            (state.name.clone(), state.criteria.clone())
        };
        validate_form(&name, &criteria)?;

        let _guard = InFlight::acquire(&self.busy).ok_or(GenerationError::Busy)?;
        self.state.lock().generated = None;

        debug!(generator = generator.name(), kind = criteria.kind().as_str(), "generating secret");
        let result = match &criteria {
            SecretCriteria::Password(c) => generator
                .generate_password(c)
                .await
                .map(|resp| GeneratedSecret {
                    value: resp.password,
                    comments: None,
                }),
            SecretCriteria::ApiKey(c) => generator
                .suggest_api_key(c)
                .await
                .map(|resp| GeneratedSecret {
                    value: resp.api_key,
                    comments: resp.comments,
                }),
        };

        match result {
            Ok(generated) => {
                self.state.lock().generated = Some(generated.clone());
                Ok(generated)
            }
            Err(e) => {
                warn!(generator = generator.name(), error = %e, "secret generation failed");
                Err(e)
            }
        }
    }

    /// Store the generated value in `repository`, then reset the draft.
    pub fn save(&self, repository: &SecretRepository) -> Result<SecretRecord> {
        if self.is_busy() {
            return Err(GenerationError::Busy);
        }

        let secret = {
            let state = self.state.lock();
            let generated = state
                .generated
                .as_ref()
                .ok_or(GenerationError::NothingGenerated)?;
            NewSecret::new(
                state.name.trim(),
                state.criteria.kind(),
                generated.value.clone(),
            )
            .with_context(state.criteria.context())
        };

        let record = repository.add(secret)?;
        info!(id = %record.id.short(), kind = record.kind.as_str(), "draft saved");
        self.reset();
        Ok(record)
    }

    /// Clear the name and generated value and restore default criteria of the same kind.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.name.clear();
        state.criteria = match state.criteria.kind() {
            SecretKind::Password => PasswordCriteria::default().into(),
            SecretKind::ApiKey => ApiKeyCriteria::default().into(),
        };
        state.generated = None;
    }
}
