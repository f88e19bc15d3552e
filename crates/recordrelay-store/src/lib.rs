//! Keyed persistent store for delivered records.
//!
//! Provides the [`KeyedStore`] trait and a [`SqliteKeyedStore`]
//! implementation with overwrite-on-conflict entry semantics (last write
//! wins per key, not an append log).

#![warn(clippy::pedantic)]

pub mod backend;
pub mod error;
pub mod sqlite;

pub use backend::KeyedStore;
pub use error::StoreError;
pub use sqlite::SqliteKeyedStore;
