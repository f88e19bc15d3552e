//! `SQLite`-backed implementation of [`KeyedStore`].
//!
//! Uses a single `Mutex<Connection>` for thread safety.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use recordrelay_types::StoreName;
use rusqlite::Connection;

use crate::backend::KeyedStore;
use crate::error::{self, StoreError};

/// `SQLite` datetime format (UTC, no timezone suffix).
const SQLITE_DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Idempotent DDL for the entry table.
const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS store_entries (
    store TEXT NOT NULL,
    entry_key TEXT NOT NULL,
    payload BLOB NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (store, entry_key)
);
";

/// `SQLite`-backed keyed storage.
///
/// Create with [`SqliteKeyedStore::open`] for file-backed persistence
/// or [`SqliteKeyedStore::in_memory`] for tests.
pub struct SqliteKeyedStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyedStore {
    /// Open or create a `SQLite` store database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory can't be created,
    /// or [`StoreError::Sqlite`] if the database can't be opened.
    pub fn open(path: &Path) -> error::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory `SQLite` store (for testing).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] if the in-memory database can't be
    /// initialized.
    pub fn in_memory() -> error::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the connection lock.
    fn lock_conn(&self) -> error::Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Format current UTC time for `SQLite` storage.
    fn now_sqlite() -> String {
        Utc::now().format(SQLITE_DATETIME_FMT).to_string()
    }

    #[cfg(test)]
    fn get_updated_at(&self, store: &StoreName, key: &str) -> error::Result<Option<String>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT updated_at FROM store_entries WHERE store = ?1 AND entry_key = ?2",
        )?;
        let mut rows = stmt.query(rusqlite::params![store.as_str(), key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }
}

impl KeyedStore for SqliteKeyedStore {
    fn put(
        &self,
        store: &StoreName,
        key: &str,
        payload: &[u8],
        overwrite: bool,
    ) -> error::Result<()> {
        let conn = self.lock_conn()?;
        let now = Self::now_sqlite();

        let changed = if overwrite {
            conn.execute(
                "INSERT INTO store_entries (store, entry_key, payload, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (store, entry_key)
                 DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
                rusqlite::params![store.as_str(), key, payload, now],
            )?
        } else {
            conn.execute(
                "INSERT INTO store_entries (store, entry_key, payload, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (store, entry_key) DO NOTHING",
                rusqlite::params![store.as_str(), key, payload, now],
            )?
        };

        if changed == 0 {
            return Err(StoreError::DuplicateKey {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn get(&self, store: &StoreName, key: &str) -> error::Result<Option<Vec<u8>>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare("SELECT payload FROM store_entries WHERE store = ?1 AND entry_key = ?2")?;
        let mut rows = stmt.query(rusqlite::params![store.as_str(), key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    fn entry_count(&self, store: &StoreName) -> error::Result<u64> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM store_entries WHERE store = ?1",
            rusqlite::params![store.as_str()],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
