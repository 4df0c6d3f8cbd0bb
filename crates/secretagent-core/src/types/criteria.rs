//! Generation criteria.
//!
//! These double as the request payloads sent to the generation service, so
//! their serialized field names are part of that boundary.

use serde::{Deserialize, Serialize};

use super::{GenerationContext, SecretKind};

/// Shortest password that may be requested.
pub const MIN_PASSWORD_LENGTH: u32 = 8;

/// Longest password that may be requested.
pub const MAX_PASSWORD_LENGTH: u32 = 128;

/// Password length used when none is given.
pub const DEFAULT_PASSWORD_LENGTH: u32 = 16;

fn default_length() -> u32 {
    DEFAULT_PASSWORD_LENGTH
}

fn default_true() -> bool {
    true
}

/// Criteria for a generated password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCriteria {
    /// Desired length, within `[MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH]`.
    #[serde(default = "default_length")]
    pub length: u32,

    /// Include digits.
    #[serde(default = "default_true")]
    pub include_numbers: bool,

    /// Include symbols.
    #[serde(default = "default_true")]
    pub include_symbols: bool,
}

impl Default for PasswordCriteria {
    fn default() -> Self {
        Self {
            length: DEFAULT_PASSWORD_LENGTH,
            include_numbers: true,
            include_symbols: true,
        }
    }
}

/// Criteria for a suggested API key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyCriteria {
    /// What the key is for.
    pub service_description: String,

    /// What the key may do (e.g. "read-only").
    pub access_level: String,
}

/// Criteria for either kind of secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretCriteria {
    Password(PasswordCriteria),
    ApiKey(ApiKeyCriteria),
}

impl SecretCriteria {
    /// Kind of secret these criteria produce.
    pub fn kind(&self) -> SecretKind {
        match self {
            Self::Password(_) => SecretKind::Password,
            Self::ApiKey(_) => SecretKind::ApiKey,
        }
    }

    /// Metadata to keep alongside the generated secret.
    pub fn context(&self) -> GenerationContext {
        match self {
            Self::Password(p) => GenerationContext {
                length: Some(p.length),
                include_numbers: Some(p.include_numbers),
                include_symbols: Some(p.include_symbols),
                ..Default::default()
            },
            Self::ApiKey(a) => GenerationContext {
                service_description: Some(a.service_description.clone()),
                access_level: Some(a.access_level.clone()),
                ..Default::default()
            },
        }
    }
}

impl From<PasswordCriteria> for SecretCriteria {
    fn from(criteria: PasswordCriteria) -> Self {
        Self::Password(criteria)
    }
}

impl From<ApiKeyCriteria> for SecretCriteria {
    fn from(criteria: ApiKeyCriteria) -> Self {
        Self::ApiKey(criteria)
    }
}
