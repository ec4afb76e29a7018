//! Persistent key-value backing stores.
//!
//! The caches treat values as opaque strings (serialized JSON they own the
//! schema of). Two implementations ship:
//!
//! - [`MemoryStore`]: a process-local map, for tests and for runs that
//!   don't want anything written to disk.
//! - [`FileStore`]: one JSON object file, rewritten atomically (tmp +
//!   rename) on every mutation. Default location:
//!   `~/.cache/wayfinder/store.json`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::{Result, WayfinderError};

/// String-keyed persistent store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored. Order is not guaranteed.
    async fn keys(&self) -> Result<Vec<String>>;
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-process [`KeyValueStore`]. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

// ============================================================================
// FileStore
// ============================================================================

/// [`KeyValueStore`] persisted as a single JSON object file.
///
/// Mutations are serialised through an internal lock so concurrent writers
/// within one process don't lose each other's keys. Across processes the
/// last rename wins.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by the file at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at the default location: `~/.cache/wayfinder/store.json`.
    pub fn default_location() -> Self {
        Self::new(default_store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(WayfinderError::Store(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Load for a read-modify-write cycle. A corrupt file is discarded so
    /// the next write heals it.
    async fn load_for_update(&self) -> Result<BTreeMap<String, String>> {
        match self.load().await {
            Err(WayfinderError::Json(e)) => {
                debug!(path = %self.path.display(), error = %e, "discarding corrupt store file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                WayfinderError::Store(format!(
                    "failed to create store dir {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&tmp_path, json).await.map_err(|e| {
            WayfinderError::Store(format!("failed to write {}: {e}", tmp_path.display()))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            WayfinderError::Store(format!(
                "failed to rename {} → {}: {e}",
                tmp_path.display(),
                self.path.display()
            ))
        })?;
        Ok(())
    }
}

/// Default store path: `~/.cache/wayfinder/store.json`.
pub fn default_store_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("wayfinder")
        .join("store.json")
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load_for_update().await?;
        entries.insert(key.to_owned(), value);
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load_for_update().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_keys().collect())
    }
}
