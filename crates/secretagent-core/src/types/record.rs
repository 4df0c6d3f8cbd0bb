//! Secret record model.
//!
//! The JSON shape of [`SecretRecord`] is the persisted layout: an object with
//! `id`, `name`, `type`, `value`, `createdAt`, plus the optional generation
//! context fields flattened alongside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::SecretId;
use crate::secret::SecretString;

/// Kind of secret held by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecretKind {
    /// A generated password.
    Password,
    /// A suggested API key.
    ApiKey,
}

impl SecretKind {
    /// Wire name as persisted (`password` / `apiKey`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::ApiKey => "apiKey",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Password => "Password",
            Self::ApiKey => "API Key",
        }
    }
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SecretKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "password" => Ok(Self::Password),
            "apikey" => Ok(Self::ApiKey),
            other => Err(format!("unknown secret kind: {other}")),
        }
    }
}

/// Criteria the secret was generated from.
///
/// Kept for display only; never re-validated after the record is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationContext {
    /// Service the API key is for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,

    /// Requested access level of the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,

    /// Requested password length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Whether digits were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_numbers: Option<bool>,

    /// Whether symbols were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_symbols: Option<bool>,
}

impl GenerationContext {
    /// True when no metadata is present.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A stored password or API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretRecord {
    /// Unique identifier, assigned at creation.
    pub id: SecretId,

    /// User-supplied label.
    pub name: String,

    /// Password or API key.
    #[serde(rename = "type")]
    pub kind: SecretKind,

    /// The secret payload.
    pub value: SecretString,

    /// Creation timestamp, assigned at creation.
    pub created_at: DateTime<Utc>,

    /// Generation criteria, if any.
    #[serde(flatten)]
    pub context: GenerationContext,
}

impl SecretRecord {
    /// Case-insensitive search over `name` and `serviceDescription`.
    ///
    /// An empty filter matches every record.
    pub fn matches(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .context
                .service_description
                .as_deref()
                .is_some_and(|desc| desc.to_lowercase().contains(&needle))
    }
}

/// A secret that has not been stored yet; `id` and `createdAt` are still unassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSecret {
    pub name: String,
    pub kind: SecretKind,
    pub value: SecretString,
    pub context: GenerationContext,
}

impl NewSecret {
    /// Create a new secret without generation metadata.
    pub fn new(name: impl Into<String>, kind: SecretKind, value: impl Into<SecretString>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
            context: GenerationContext::default(),
        }
    }

    /// Attach generation metadata.
    pub fn with_context(mut self, context: GenerationContext) -> Self {
        self.context = context;
        self
    }

    /// Materialize into a record with the given identity and timestamp.
    pub fn into_record(self, id: SecretId, created_at: DateTime<Utc>) -> SecretRecord {
        SecretRecord {
            id,
            name: self.name,
            kind: self.kind,
            value: self.value,
            created_at,
            context: self.context,
        }
    }
}
