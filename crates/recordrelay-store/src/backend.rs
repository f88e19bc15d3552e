//! Keyed store trait definition.
//!
//! [`KeyedStore`] defines the storage contract for delivered record
//! payloads. Entries are individually keyed and overwritable; the pipeline
//! assumes at-most-one writer per key per logical run.

use recordrelay_types::StoreName;

use crate::error;

/// Storage contract for keyed record payloads.
///
/// Implementations must be `Send + Sync` for use behind `Arc<dyn KeyedStore>`.
pub trait KeyedStore: Send + Sync {
    /// Write one entry under `(store, key)`.
    ///
    /// With `overwrite` set, an existing entry under the same key is
    /// replaced (last write wins). Without it, a conflicting key fails
    /// with [`StoreError::DuplicateKey`](crate::StoreError::DuplicateKey).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure.
    fn put(
        &self,
        store: &StoreName,
        key: &str,
        payload: &[u8],
        overwrite: bool,
    ) -> error::Result<()>;

    /// Read back the entry under `(store, key)`.
    ///
    /// Returns `Ok(None)` when no entry exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure.
    fn get(&self, store: &StoreName, key: &str) -> error::Result<Option<Vec<u8>>>;

    /// Count logical entries in `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) on storage failure.
    fn entry_count(&self, store: &StoreName) -> error::Result<u64>;
}
