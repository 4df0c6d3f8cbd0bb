//! Local persistence for Secret Agent.
//!
//! - [`backend`]: raw string key-value stores (files on disk, or memory)
//! - [`adapter`]: typed, failure-tolerant reads and best-effort writes
//! - [`repository`]: the secret collection, ordered by recency

pub mod adapter;
pub mod backend;
pub mod error;
pub mod repository;

pub use adapter::StoreAdapter;
pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use error::{Result, StorageError};
pub use repository::SecretRepository;

use secretagent_core::config::{Config, StorageBackend};
use std::sync::Arc;

/// Build the repository described by the `storage` config section.
pub fn open_repository(config: &Config) -> Result<SecretRepository> {
    let backend: Arc<dyn KeyValueBackend> = match config.storage.backend {
        StorageBackend::File => {
            let dir = config
                .storage_dir()
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            Arc::new(FileBackend::new(dir))
        }
        StorageBackend::Memory => Arc::new(MemoryBackend::new()),
    };

    Ok(SecretRepository::with_key(
        StoreAdapter::new(backend),
        config.storage.key.clone(),
    ))
}
