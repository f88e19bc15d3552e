//! Flow error taxonomy.
//!
//! Every failure the pipeline can produce maps onto exactly one variant, so
//! callers can branch on "nothing to do" ([`FlowError::NoRecordsFound`])
//! versus "malformed" ([`FlowError::EmptyInput`]) versus delivery failures.
//! There is no retry or skip-and-continue anywhere: one bad record fails
//! the whole batch, and the calling system redelivers later.

use thiserror::Error;

/// Errors produced by extraction, mapping, routing, or delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The inbound document is empty or could not be parsed.
    #[error("input document is empty or unparseable: {0}")]
    EmptyInput(String),

    /// The document parsed but contains no target entity occurrences.
    #[error("no '{marker}' records found in input document")]
    NoRecordsFound { marker: String },

    /// A record lacks its primary identifying key (empty after trimming).
    #[error("required field '{field}' is missing or empty")]
    MissingRequiredField { field: String },

    /// Malformed or inconsistent flow configuration.
    #[error("flow configuration error: {0}")]
    Configuration(String),

    /// The keyed store handle could not be acquired. Reported once,
    /// aborts the batch.
    #[error("keyed store unavailable: {0}")]
    StoreUnavailable(String),

    /// An individual store write failed.
    #[error("store write failed for key '{key}': {message}")]
    StoreWrite { key: String, message: String },

    /// The remote endpoint answered with a non-200 status for one record.
    /// The response body is captured for diagnostics.
    #[error("remote delivery failed for key '{key}': status {status}")]
    RemoteDelivery {
        key: String,
        status: u16,
        body: String,
    },

    /// The HTTP request never produced a status code (connection refused,
    /// timeout). Distinct from [`FlowError::RemoteDelivery`] so callers can
    /// branch on status codes.
    #[error("http transport error: {0}")]
    HttpTransport(String),
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, FlowError>;
