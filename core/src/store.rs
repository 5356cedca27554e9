use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use rusqlite::{Connection, params};

/// Entry ledger: JSON array of `FoodEntry`, insertion order = chronological.
pub const ENTRIES_KEY: &str = "foodEntries";
/// Calendar progress: JSON array of `DayProgress`, insertion order.
pub const PROGRESS_KEY: &str = "calorieProgress";
/// Macro goals: single JSON `MacroGoals` object.
pub const GOALS_KEY: &str = "macroGoals";

/// Narrow key-value persistence seam. Values are JSON-serialized blobs
/// under stable named keys; every list write is a whole-list write, so
/// two interleaved read-modify-write cycles are last-write-wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<bool>;
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open store: {}", path.display()))?;
        let store = SqliteStore {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = SqliteStore {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        self.conn()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("Store lock poisoned"))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Local::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT INTO kv (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let rows = self
            .conn()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(rows > 0)
    }
}

/// In-memory store for tests and fakes. Same read-modify-write surface
/// as the persistent store, so interleaving behavior is observable.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Store lock poisoned"))?;
        Ok(values.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(store: &dyn KeyValueStore) {
        assert!(store.get("missing").unwrap().is_none());

        store.set("k", "[1,2,3]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1,2,3]"));

        // Overwrite replaces, never appends
        store.set("k", "[]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[]"));

        assert!(store.remove("k").unwrap());
        assert!(store.get("k").unwrap().is_none());
        assert!(!store.remove("k").unwrap());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        roundtrip(&MemoryStore::new());
    }

    #[test]
    fn test_sqlite_store_roundtrip() {
        roundtrip(&SqliteStore::open_in_memory().unwrap());
    }

    #[test]
    fn test_sqlite_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kv.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set(ENTRIES_KEY, "[{\"description\":\"x\"}]").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get(ENTRIES_KEY).unwrap().as_deref(),
            Some("[{\"description\":\"x\"}]")
        );
    }

    #[test]
    fn test_keys_are_independent() {
        let store = MemoryStore::new();
        store.set(ENTRIES_KEY, "[]").unwrap();
        store.set(GOALS_KEY, "{\"calories\":1800}").unwrap();

        assert_eq!(store.get(ENTRIES_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(
            store.get(GOALS_KEY).unwrap().as_deref(),
            Some("{\"calories\":1800}")
        );
        assert!(store.get(PROGRESS_KEY).unwrap().is_none());
    }
}
