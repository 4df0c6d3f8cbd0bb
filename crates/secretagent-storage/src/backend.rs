//! Key-value storage backends.
//!
//! Defines the [`KeyValueBackend`] trait, a string-to-string store with the
//! same shape as a browser's `localStorage`, and two implementations:
//! [`FileBackend`], which keeps one JSON file per key, and [`MemoryBackend`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use secretagent_core::id;
use tracing::debug;

use crate::error::{Result, StorageError};

/// String key-value store.
pub trait KeyValueBackend: Send + Sync {
    /// Fetch the raw value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// List stored keys, sorted.
    fn keys(&self) -> Result<Vec<String>>;

    /// Remove every key.
    fn clear(&self) -> Result<()>;
}

/// Reject keys that could escape the storage directory.
fn validate_key(key: &str) -> Result<()> {
    if id::is_valid_key(key) {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(format!(
            "'{key}' (allowed: alphanumeric, underscore, hyphen; max {} characters)",
            id::MAX_KEY_LEN
        )))
    }
}

/// A file-system-backed store.
///
/// Each key is stored as `{base_dir}/{key}.json`. The directory is created
/// with mode `0700` and files with mode `0600` on Unix.
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `base_dir`. The directory is created on first write.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Root directory of this backend.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create the base directory if missing. Only a directory created here
    /// is restricted to `0700`; an existing one keeps its mode.
    fn ensure_dir(&self) -> Result<()> {
        if self.base_dir.is_dir() {
            return Ok(());
        }

        std::fs::create_dir_all(&self.base_dir)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.base_dir, std::fs::Permissions::from_mode(0o700))?;
        }

        Ok(())
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

/// Write `data` to `path` through a temp file and rename.
///
/// The temp file is created with mode 0600 on Unix, so the value is never
/// readable by others, and it is removed again if any step fails.
fn write_item_file(path: &Path, data: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    // A leftover from an interrupted write may carry looser permissions.
    match std::fs::remove_file(&temp_path) {
        Ok(()) => debug!(path = %temp_path.display(), "removed stale temp file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let result = write_new_file(&temp_path, data).and_then(|()| {
        std::fs::rename(&temp_path, path)?;
        Ok(())
    });

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}

fn write_new_file(path: &Path, data: &[u8]) -> Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

impl KeyValueBackend for FileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        let path = self.item_path(key);
        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.ensure_dir()?;

        let path = self.item_path(key);
        debug!(key, path = %path.display(), bytes = value.len(), "writing item");
        write_item_file(&path, value.as_bytes())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        validate_key(key)?;

        let path = self.item_path(key);
        if path.exists() {
            debug!(key, path = %path.display(), "removing item");
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> Result<()> {
        for key in self.keys()? {
            self.remove_item(&key)?;
        }
        Ok(())
    }
}

/// An in-memory store. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryBackend {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.items.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> Result<()> {
        self.items.write().clear();
        Ok(())
    }
}
