//! Field extractor: locates raw entity occurrences in a parsed document.

use recordrelay_types::FlowError;

use crate::document::{DocNode, Document};

/// One unmapped entity occurrence located in the source document.
///
/// Borrows from the document, which is immutable for the run, so
/// re-extraction yields the same occurrences in the same order.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    node: &'a DocNode,
}

impl<'a> RawRecord<'a> {
    /// The underlying document node scoped to this occurrence.
    #[must_use]
    pub fn node(&self) -> &'a DocNode {
        self.node
    }
}

/// Find every occurrence of the `marker` entity anywhere in the document,
/// regardless of nesting depth or namespace, in document order.
///
/// # Errors
///
/// Returns [`FlowError::NoRecordsFound`] when the search yields zero
/// occurrences, distinct from parse failures so callers can branch on
/// "nothing to do" vs. "malformed".
pub fn extract_records<'a>(
    doc: &'a Document,
    marker: &str,
) -> Result<Vec<RawRecord<'a>>, FlowError> {
    let records: Vec<RawRecord<'a>> = doc
        .root()
        .find_all(marker)
        .into_iter()
        .map(|node| RawRecord { node })
        .collect();

    if records.is_empty() {
        return Err(FlowError::NoRecordsFound {
            marker: marker.to_string(),
        });
    }
    Ok(records)
}
