//! Field-level validation.
//!
//! Runs before any generation request is made. All problems are collected so
//! a form can show every message at once.

use serde::Serialize;
use std::fmt;

use crate::types::{
    ApiKeyCriteria, PasswordCriteria, SecretCriteria, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name, as used on the wire (`name`, `length`, `serviceDescription`, ...).
    pub field: &'static str,

    /// User-facing message.
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// One or more invalid fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message for a given field, if it failed.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&joined.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a secret label. Blank (whitespace-only) names are rejected too.
pub fn check_name(name: &str) -> Option<FieldError> {
    name.trim()
        .is_empty()
        .then(|| FieldError::new("name", "Name is required"))
}

impl PasswordCriteria {
    /// Collect problems with these criteria.
    pub fn check(&self, errors: &mut ValidationErrors) {
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&self.length) {
            errors.push(FieldError::new(
                "length",
                format!(
                    "Length must be between {} and {} characters",
                    MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
                ),
            ));
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.check(&mut errors);
        errors.into_result()
    }
}

impl ApiKeyCriteria {
    /// Collect problems with these criteria.
    pub fn check(&self, errors: &mut ValidationErrors) {
        if self.service_description.trim().is_empty() {
            errors.push(FieldError::new(
                "serviceDescription",
                "Service description is required",
            ));
        }
        if self.access_level.trim().is_empty() {
            errors.push(FieldError::new("accessLevel", "Access level is required"));
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.check(&mut errors);
        errors.into_result()
    }
}

impl SecretCriteria {
    pub fn check(&self, errors: &mut ValidationErrors) {
        match self {
            Self::Password(p) => p.check(errors),
            Self::ApiKey(a) => a.check(errors),
        }
    }
}

/// Validate a whole add-secret form: the label plus its criteria.
pub fn validate_form(name: &str, criteria: &SecretCriteria) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(err) = check_name(name) {
        errors.push(err);
    }
    criteria.check(&mut errors);
    errors.into_result()
}
