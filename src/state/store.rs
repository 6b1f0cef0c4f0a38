use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::task;

use super::link::LinkCollection;

/// Storage key holding the serialized link list
pub const LINKS_KEY: &str = "links";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("background task failed: {0}")]
    Join(#[from] task::JoinError),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum LinkStoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("malformed link list: {0}")]
    Json(#[from] serde_json::Error),
}

/// Asynchronous string key-value persistence
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Key-value store backed by a single SQLite table.
///
/// rusqlite::Connection is not Sync, so every call opens its own
/// connection inside a blocking task.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path` and initialize the schema.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let db_path = db_path.into();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;

        tracing::info!(path = %db_path.display(), "storage initialized");

        Ok(Self { db_path })
    }

    fn get_blocking(db_path: &Path, key: &str) -> Result<Option<String>, StorageError> {
        let conn = Connection::open(db_path)?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set_blocking(db_path: &Path, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = Connection::open(db_path)?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let db_path = self.db_path.clone();
        let key = key.to_string();
        task::spawn_blocking(move || Self::get_blocking(&db_path, &key)).await?
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let db_path = self.db_path.clone();
        let key = key.to_string();
        let value = value.to_string();
        task::spawn_blocking(move || Self::set_blocking(&db_path, &key, &value)).await?
    }
}

/// Process-local store. Used in tests and when the database cannot be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Persists the link collection under `LINKS_KEY`.
///
/// Faults never reach the caller: a failed load yields the default seed,
/// a failed save is logged and dropped.
///
/// Saves are numbered when the snapshot is taken and written one at a
/// time; a snapshot older than the last one written is skipped.
#[derive(Clone)]
pub struct LinkStore {
    backend: Arc<dyn KeyValueStore>,
    /// Number handed to the most recent snapshot
    issued: Arc<AtomicU64>,
    /// Number of the snapshot last written; held across each write
    written: Arc<tokio::sync::Mutex<u64>>,
}

impl LinkStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            issued: Arc::new(AtomicU64::new(0)),
            written: Arc::new(tokio::sync::Mutex::new(0)),
        }
    }

    pub async fn load(&self) -> LinkCollection {
        match self.try_load().await {
            Ok(Some(links)) => {
                tracing::info!(count = links.len(), "loaded links");
                links
            }
            Ok(None) => {
                tracing::info!("no stored links, using default seed");
                LinkCollection::default_seed()
            }
            Err(e) => {
                tracing::error!(error = %e, "error loading links");
                LinkCollection::default_seed()
            }
        }
    }

    /// Take a save slot for `links` now; the returned future writes it.
    pub fn save(&self, links: LinkCollection) -> impl Future<Output = ()> + Send + 'static {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let store = self.clone();
        async move { store.save_generation(links, generation).await }
    }

    async fn save_generation(&self, links: LinkCollection, generation: u64) {
        let mut written = self.written.lock().await;
        if *written > generation {
            tracing::debug!(generation, latest = *written, "skipping stale link snapshot");
            return;
        }

        if let Err(e) = self.try_save(&links).await {
            tracing::error!(error = %e, "error saving links");
        } else {
            tracing::debug!(count = links.len(), generation, "saved links");
        }
        *written = generation;
    }

    async fn try_load(&self) -> Result<Option<LinkCollection>, LinkStoreError> {
        match self.backend.get(LINKS_KEY).await? {
            Some(json) if !json.is_empty() => Ok(Some(LinkCollection::from_json(&json)?)),
            _ => Ok(None),
        }
    }

    async fn try_save(&self, links: &LinkCollection) -> Result<(), LinkStoreError> {
        let json = links.to_json()?;
        self.backend.set(LINKS_KEY, &json).await?;
        Ok(())
    }
}

impl std::fmt::Debug for LinkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::link::{link, LinkFields};

    /// Backend whose every call fails
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("get rejected".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("set rejected".to_string()))
        }
    }

    fn memory() -> (Arc<MemoryStore>, LinkStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = LinkStore::new(backend.clone());
        (backend, store)
    }

    #[tokio::test]
    async fn test_load_empty_returns_default_seed() {
        let (_, store) = memory();
        assert_eq!(store.load().await, LinkCollection::default_seed());
    }

    #[tokio::test]
    async fn test_load_failure_returns_default_seed() {
        let store = LinkStore::new(Arc::new(BrokenStore));
        assert_eq!(store.load().await, LinkCollection::default_seed());
    }

    #[tokio::test]
    async fn test_save_failure_is_swallowed() {
        let store = LinkStore::new(Arc::new(BrokenStore));
        store.save(LinkCollection::default_seed()).await;
    }

    #[tokio::test]
    async fn test_malformed_json_returns_default_seed() {
        let (backend, store) = memory();
        backend.set(LINKS_KEY, "{not json").await.unwrap();
        assert_eq!(store.load().await, LinkCollection::default_seed());
    }

    #[tokio::test]
    async fn test_create_then_save_then_load() {
        let (_, store) = memory();
        let mut links = store.load().await;
        let before = links.clone();

        let fields = LinkFields {
            title: "Rust".to_string(),
            url: "https://rust-lang.org".to_string(),
            icon: String::new(),
            description: "Language".to_string(),
            category: "tools".to_string(),
        };
        let created = links.create(fields.clone());
        store.save(links).await;

        let loaded = store.load().await;
        assert_eq!(loaded.len(), before.len() + 1);
        let new: Vec<_> = loaded.iter().filter(|l| before.get(&l.id).is_none()).collect();
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].id, created.id);
        assert_eq!(new[0].fields(), fields);
    }

    #[tokio::test]
    async fn test_older_snapshot_finishing_last_is_dropped() {
        let (_, store) = memory();
        let older = LinkCollection::from(vec![link("a", "Older", "work")]);
        let newer = LinkCollection::from(vec![link("a", "Older", "work"), link("b", "Newer", "work")]);

        let first = store.save(older);
        let second = store.save(newer.clone());
        second.await;
        first.await;

        assert_eq!(store.load().await, newer);
    }

    #[tokio::test]
    async fn test_sqlite_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("linkboard.db");

        let first = SqliteStore::open(&db_path).unwrap();
        assert_eq!(first.get(LINKS_KEY).await.unwrap(), None);
        first.set(LINKS_KEY, "one").await.unwrap();
        first.set(LINKS_KEY, "two").await.unwrap();

        let second = SqliteStore::open(&db_path).unwrap();
        assert_eq!(second.get(LINKS_KEY).await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_link_store_over_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(SqliteStore::open(dir.path().join("links.db")).unwrap());
        let store = LinkStore::new(backend);

        let links = LinkCollection::from(vec![link("a", "Alpha", "work"), link("b", "Beta", "odd")]);
        store.save(links.clone()).await;
        assert_eq!(store.load().await, links);
    }
}
