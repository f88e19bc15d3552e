//! Store sink: one keyed, overwritable entry per canonical record.

use recordrelay_store::KeyedStore;
use recordrelay_types::{
    CanonicalRecord, DeliveryOutcome, DeliveryResult, FlowError, SinkKind, StoreName,
};

use crate::diagnostics::DiagnosticSink;

/// Writes each canonical record into a named persistent keyed store, entry
/// key = record key, last write wins per key.
pub struct StoreSink<'a> {
    backend: &'a dyn KeyedStore,
    store: StoreName,
}

impl<'a> StoreSink<'a> {
    #[must_use]
    pub fn new(backend: &'a dyn KeyedStore, store: StoreName) -> Self {
        Self { backend, store }
    }

    /// Deliver the whole batch, one entry per record, in extraction order.
    ///
    /// Each write attaches a diagnostic copy of the serialized record,
    /// tagged by key, for audit.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::StoreWrite`] on the first failing write; no
    /// partial-commit recovery is attempted, the whole batch aborts.
    pub fn deliver(
        &self,
        records: &[CanonicalRecord],
        diagnostics: &dyn DiagnosticSink,
    ) -> Result<Vec<DeliveryResult>, FlowError> {
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let key = record.key();
            let payload = record.to_json().to_string();

            self.backend
                .put(&self.store, key, payload.as_bytes(), true)
                .map_err(|e| FlowError::StoreWrite {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;

            diagnostics.attach(
                &format!("store-entry-{key}"),
                &payload,
                "application/json",
            );
            tracing::debug!(store = %self.store, key, "record written to keyed store");

            results.push(DeliveryResult {
                key: key.to_string(),
                sink: SinkKind::Store,
                outcome: DeliveryOutcome::Stored {
                    entry_key: key.to_string(),
                },
            });
        }

        tracing::info!(
            store = %self.store,
            records = results.len(),
            "batch persisted to keyed store"
        );
        Ok(results)
    }
}
