//! Store backend error types.

/// Errors produced by [`KeyedStore`](crate::KeyedStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying `SQLite` failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// File-system I/O failure (e.g. creating the database directory).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal mutex was poisoned by a panicked thread.
    #[error("keyed store lock poisoned")]
    LockPoisoned,

    /// Insert without overwrite hit an existing entry under the same key.
    #[error("entry '{key}' already exists and overwrite is disabled")]
    DuplicateKey { key: String },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, StoreError>;
