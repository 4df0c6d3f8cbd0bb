//! The secret repository.
//!
//! Holds the secret collection in memory and writes the whole collection back
//! through the [`StoreAdapter`] after every change. The collection is kept
//! sorted by `createdAt`, newest first, at write time.

use chrono::Utc;
use parking_lot::RwLock;
use secretagent_core::validation::check_name;
use secretagent_core::{NewSecret, SecretId, SecretRecord, ValidationErrors};
use tracing::{debug, info};

use crate::adapter::StoreAdapter;
use crate::error::{Result, StorageError};

/// Store key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "secrets";

/// In-memory secret collection backed by a key-value store.
///
/// The collection is loaded lazily on first use. Only `add` and `delete`
/// change it; records themselves are never updated.
pub struct SecretRepository {
    store: StoreAdapter,
    key: String,
    secrets: RwLock<Option<Vec<SecretRecord>>>,
}

impl SecretRepository {
    /// Repository stored under the default key.
    pub fn new(store: StoreAdapter) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Repository stored under `key`.
    pub fn with_key(store: StoreAdapter, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            secrets: RwLock::new(None),
        }
    }

    /// Store key of the collection.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Vec<SecretRecord> {
        let secrets: Vec<SecretRecord> = self.store.read(&self.key, Vec::new());
        debug!(key = %self.key, count = secrets.len(), "loaded secrets");
        secrets
    }

    fn ensure_loaded(&self) {
        if self.secrets.read().is_some() {
            return;
        }

        let mut guard = self.secrets.write();
        if guard.is_none() {
            *guard = Some(self.load());
        }
    }

    /// Drop the cached collection and read it again from the store.
    ///
    /// Picks up changes written by another process.
    pub fn reload(&self) {
        let fresh = self.load();
        *self.secrets.write() = Some(fresh);
    }

    /// Store a new secret, assigning its id and creation time.
    pub fn add(&self, secret: NewSecret) -> Result<SecretRecord> {
        if let Some(err) = check_name(&secret.name) {
            let mut errors = ValidationErrors::new();
            errors.push(err);
            return Err(StorageError::Validation(errors));
        }

        self.ensure_loaded();
        let mut guard = self.secrets.write();
        let secrets = guard.get_or_insert_with(Vec::new);

        let mut id = SecretId::generate();
        while secrets.iter().any(|s| s.id == id) {
            id = SecretId::generate();
        }

        let record = secret.into_record(id, Utc::now());
        secrets.insert(0, record.clone());
        sort_by_recency(secrets);
        self.store.write(&self.key, secrets);

        info!(
            id = %record.id.short(),
            kind = record.kind.as_str(),
            count = secrets.len(),
            "secret added"
        );
        Ok(record)
    }

    /// Remove the secret with `id`. Returns whether anything was removed;
    /// an unknown id is not an error.
    pub fn delete(&self, id: &SecretId) -> bool {
        self.ensure_loaded();
        let mut guard = self.secrets.write();
        let secrets = guard.get_or_insert_with(Vec::new);

        let before = secrets.len();
        secrets.retain(|s| &s.id != id);
        let removed = secrets.len() != before;
        self.store.write(&self.key, secrets);

        if removed {
            info!(id = %id.short(), count = secrets.len(), "secret deleted");
        } else {
            debug!(id = %id, "delete of unknown secret ignored");
        }
        removed
    }

    /// Secrets whose name or service description contains `filter`,
    /// ignoring case, in stored order. An empty filter returns everything.
    pub fn list(&self, filter: &str) -> Vec<SecretRecord> {
        self.ensure_loaded();
        self.secrets
            .read()
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|s| s.matches(filter))
            .cloned()
            .collect()
    }

    /// Look up a secret by its full id.
    pub fn get(&self, id: &SecretId) -> Option<SecretRecord> {
        self.ensure_loaded();
        self.secrets
            .read()
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|s| &s.id == id)
            .cloned()
    }

    /// Look up a secret by its full id or a unique id prefix.
    pub fn find(&self, id_or_prefix: &str) -> Result<Option<SecretRecord>> {
        if id_or_prefix.is_empty() {
            return Ok(None);
        }
        if let Some(exact) = self.get(&SecretId::new(id_or_prefix)) {
            return Ok(Some(exact));
        }

        let mut matches: Vec<SecretRecord> = self
            .list("")
            .into_iter()
            .filter(|s| s.id.as_str().starts_with(id_or_prefix))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            count => Err(StorageError::AmbiguousId {
                prefix: id_or_prefix.to_string(),
                count,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.ensure_loaded();
        self.secrets.read().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stable sort, newest first.
fn sort_by_recency(secrets: &mut [SecretRecord]) {
    secrets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
