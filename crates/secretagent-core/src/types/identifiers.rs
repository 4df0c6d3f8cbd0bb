//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a stored secret.
///
/// Assigned once by the repository when a record is created and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretId(String);

impl SecretId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, unique identifier.
    pub fn generate() -> Self {
        Self(crate::id::uuid())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for tables and log lines.
    pub fn short(&self) -> &str {
        crate::id::short(&self.0)
    }
}

impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SecretId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SecretId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for SecretId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
