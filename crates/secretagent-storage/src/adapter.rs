//! Typed access to a key-value backend.
//!
//! Reads never fail: a missing key, an unparseable payload, a backend error,
//! or no backend at all all yield the caller's default. Writes are best
//! effort: failures are logged and swallowed.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::backend::KeyValueBackend;
use crate::error::{Result, StorageError};

/// JSON (de)serializing wrapper around an optional [`KeyValueBackend`].
#[derive(Clone)]
pub struct StoreAdapter {
    backend: Option<Arc<dyn KeyValueBackend>>,
}

impl StoreAdapter {
    /// Adapter over a live backend.
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Adapter with no backend: every read yields the default and every write is dropped.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Read and parse the value under `key`, or return `default`.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_read(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!(key, error = %e, "error reading stored value, using default");
                default
            }
        }
    }

    /// Serialize `value` and store it under `key`. Never fails.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_write(key, value) {
            error!(key, error = %e, "failed to persist value");
        }
    }

    fn try_read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(backend) = &self.backend else {
            debug!(key, "no storage backend, reading default");
            return Ok(None);
        };

        match backend.get_item(key)? {
            Some(raw) if !raw.trim().is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    fn try_write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let backend = self
            .backend
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("no storage backend".to_string()))?;

        let json = serde_json::to_string(value)?;
        backend.set_item(key, &json)
    }
}
