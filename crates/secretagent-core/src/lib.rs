//! # secretagent-core
//!
//! Core types, validation, and configuration for Secret Agent.
//!
//! This crate provides shared functionality used across all Secret Agent crates:
//!
//! - **Types**: The secret record model and generation criteria
//! - **Validation**: Field-level checks run before any generation request
//! - **Configuration**: Loading, validation, and persistence of the config file
//! - **Utilities**: Path resolution, ID generation, and redacted secret strings

pub mod config;
pub mod error;
pub mod id;
pub mod paths;
pub mod secret;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use error::ConfigError;
pub use secret::SecretString;
pub use types::*;
pub use validation::{FieldError, ValidationErrors};
