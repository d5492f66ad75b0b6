//! Key-value persistence for history and favorites
//!
//! Each slot holds a whole JSON document and is overwritten on every save.
//! Failures never escape this module: loads fall back to `None` and saves are
//! best-effort, both logged.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::shared::error::{AppError, AppResult};

pub const HISTORY_KEY: &str = "unitflip-history";
pub const FAVORITES_KEY: &str = "unitflip-favorites";

/// Redb table definition for persisted slots
/// Key: slot name, Value: JSON document
const STATE_TABLE: TableDefinition<&str, &str> = TableDefinition::new("unitflip_state");

const DATABASE_FILE: &str = "unitflip.redb";

/// Raw storage backend
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> AppResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> AppResult<()>;
}

/// Redb-based storage implementation
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database inside `dir`
    pub fn open(dir: &Path) -> AppResult<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::Io(format!("Failed to create data directory: {}", e)))?;

        let db = Database::create(dir.join(DATABASE_FILE))
            .map_err(|e| AppError::Storage(format!("Failed to create database: {}", e)))?;

        // Initialize table
        {
            let write_txn = db.begin_write()
                .map_err(|e| AppError::Storage(format!("Failed to begin write transaction: {}", e)))?;
            {
                let _table = write_txn.open_table(STATE_TABLE)
                    .map_err(|e| AppError::Storage(format!("Failed to open table: {}", e)))?;
            }
            write_txn.commit()
                .map_err(|e| AppError::Storage(format!("Failed to commit transaction: {}", e)))?;
        }

        Ok(Self { db })
    }
}

impl KeyValueStore for RedbStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let read_txn = self.db.begin_read()
            .map_err(|e| AppError::Storage(format!("Failed to begin read: {}", e)))?;

        let table = read_txn.open_table(STATE_TABLE)
            .map_err(|e| AppError::Storage(format!("Failed to open table: {}", e)))?;

        let value = table.get(key)
            .map_err(|e| AppError::Storage(format!("Failed to read {}: {}", key, e)))?
            .map(|guard| guard.value().to_string());

        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let write_txn = self.db.begin_write()
            .map_err(|e| AppError::Storage(format!("Failed to begin write: {}", e)))?;

        {
            let mut table = write_txn.open_table(STATE_TABLE)
                .map_err(|e| AppError::Storage(format!("Failed to open table: {}", e)))?;

            table.insert(key, value)
                .map_err(|e| AppError::Storage(format!("Failed to insert {}: {}", key, e)))?;
        }

        write_txn.commit()
            .map_err(|e| AppError::Storage(format!("Failed to commit: {}", e)))?;

        Ok(())
    }
}

/// In-memory storage (fallback if the database cannot be opened, and for tests)
#[derive(Default)]
pub struct InMemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let slots = self.slots.lock()
            .map_err(|e| AppError::Storage(format!("Mutex poisoned: {}", e)))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let mut slots = self.slots.lock()
            .map_err(|e| AppError::Storage(format!("Mutex poisoned: {}", e)))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed, failure-absorbing front of a `KeyValueStore`.
///
/// A slot is never written before it has been loaded once, so an empty startup
/// state cannot clobber persisted data.
pub struct PersistenceStore {
    backend: Arc<dyn KeyValueStore>,
    loaded: Mutex<HashSet<String>>,
}

impl PersistenceStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            loaded: Mutex::new(HashSet::new()),
        }
    }

    /// Open the redb store in `dir`, falling back to memory when that fails
    pub fn open_or_in_memory(dir: &Path) -> Self {
        let backend: Arc<dyn KeyValueStore> = match RedbStore::open(dir) {
            Ok(store) => {
                tracing::info!("[PersistenceStore] Using database in {}", dir.display());
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!("[PersistenceStore] Failed to initialize database: {}, using in-memory fallback", e);
                Arc::new(InMemoryStore::new())
            }
        };
        Self::new(backend)
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    fn mark_loaded(&self, key: &str) {
        let mut loaded = match self.loaded.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("[PersistenceStore] Loaded-set mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        };
        loaded.insert(key.to_string());
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        match self.loaded.lock() {
            Ok(guard) => guard.contains(key),
            Err(poisoned) => poisoned.into_inner().contains(key),
        }
    }

    /// Load a slot. Missing, unreadable and corrupt slots all yield `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let result = match self.backend.read(key) {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("[PersistenceStore] Failed to parse {}: {}, using empty default", key, e);
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("[PersistenceStore] No stored value for {}", key);
                None
            }
            Err(e) => {
                tracing::warn!("[PersistenceStore] Failed to load {}: {}, using empty default", key, e);
                None
            }
        };

        self.mark_loaded(key);
        result
    }

    /// Overwrite a slot. Best-effort: errors are logged and swallowed.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if !self.is_loaded(key) {
            tracing::warn!("[PersistenceStore] Refusing to save {} before it was loaded", key);
            return;
        }

        let serialized = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("[PersistenceStore] Failed to serialize {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.backend.write(key, &serialized) {
            tracing::error!("[PersistenceStore] Failed to save {}: {}", key, e);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Backend whose every operation fails
    pub(crate) struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn read(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::Storage("storage unavailable".to_string()))
        }

        fn write(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(AppError::Storage("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_redb_round_trip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = RedbStore::open(dir.path()).unwrap();
            store.write(HISTORY_KEY, "[1,2,3]").unwrap();
            store.write(HISTORY_KEY, "[4]").unwrap();
        }

        let store = RedbStore::open(dir.path()).unwrap();
        assert_eq!(store.read(HISTORY_KEY).unwrap(), Some("[4]".to_string()));
        assert_eq!(store.read(FAVORITES_KEY).unwrap(), None);
    }

    #[test]
    fn test_typed_load_and_save() {
        let store = PersistenceStore::in_memory();
        assert_eq!(store.load::<Vec<u32>>(HISTORY_KEY), None);

        store.save(HISTORY_KEY, &vec![1u32, 2, 3]);
        assert_eq!(store.load::<Vec<u32>>(HISTORY_KEY), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_save_before_load_is_refused() {
        let backend = Arc::new(InMemoryStore::new());
        backend.write(FAVORITES_KEY, "[\"kept\"]").unwrap();
        let store = PersistenceStore::new(backend.clone());

        store.save(FAVORITES_KEY, &Vec::<String>::new());
        assert_eq!(backend.read(FAVORITES_KEY).unwrap(), Some("[\"kept\"]".to_string()));

        assert_eq!(store.load::<Vec<String>>(FAVORITES_KEY), Some(vec!["kept".to_string()]));
        store.save(FAVORITES_KEY, &Vec::<String>::new());
        assert_eq!(backend.read(FAVORITES_KEY).unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_slots_are_independent() {
        let store = PersistenceStore::in_memory();
        let _ = store.load::<Vec<u32>>(HISTORY_KEY);

        store.save(HISTORY_KEY, &vec![7u32]);
        store.save(FAVORITES_KEY, &vec![9u32]);

        assert!(store.is_loaded(HISTORY_KEY));
        assert!(!store.is_loaded(FAVORITES_KEY));
        assert_eq!(store.load::<Vec<u32>>(FAVORITES_KEY), None);
    }

    #[test]
    fn test_corrupt_slot_loads_as_none() {
        let backend = Arc::new(InMemoryStore::new());
        backend.write(HISTORY_KEY, "{definitely not a list").unwrap();
        let store = PersistenceStore::new(backend);

        assert_eq!(store.load::<Vec<u32>>(HISTORY_KEY), None);
        assert!(store.is_loaded(HISTORY_KEY));
    }

    #[test]
    fn test_backend_failures_are_absorbed() {
        let store = PersistenceStore::new(Arc::new(FailingStore));
        assert_eq!(store.load::<Vec<u32>>(HISTORY_KEY), None);
        store.save(HISTORY_KEY, &vec![1u32]);
    }

    #[test]
    fn test_unopenable_directory_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let store = PersistenceStore::open_or_in_memory(&blocker);
        let _ = store.load::<Vec<u32>>(HISTORY_KEY);
        store.save(HISTORY_KEY, &vec![5u32]);
        assert_eq!(store.load::<Vec<u32>>(HISTORY_KEY), Some(vec![5]));
    }
}
