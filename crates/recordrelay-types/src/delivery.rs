//! Delivery model types.
//!
//! Pure data types shared by the sinks and the run summary: which sink a
//! batch went to, what happened to each record, and the newtypes used to
//! address the keyed store.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of a persistent keyed store (e.g. `"ContactPersons"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreName(String);

impl StoreName {
    /// Create a new store name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoreName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for StoreName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for StoreName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Per-record outcomes
// ---------------------------------------------------------------------------

/// Which delivery strategy a batch was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Keyed persistent store.
    Store,
    /// Remote HTTP endpoint with basic authentication.
    Http,
}

impl SinkKind {
    /// Wire-format string for summaries and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Http => "http",
        }
    }
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one record at its sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum DeliveryOutcome {
    /// Written to the keyed store under `entry_key` (overwrite-on-conflict).
    Stored { entry_key: String },
    /// Accepted by the remote endpoint; response captured for audit.
    Delivered { status: u16, body: String },
    /// Connectivity probe succeeded. Fixed sentinel, no record involved.
    Probed { status: u16 },
}

/// Per-record delivery outcome, aggregated into the run summary.
///
/// Never persisted by the pipeline itself; the caller owns the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// The record's primary identifying key.
    pub key: String,
    /// Sink the record went to.
    pub sink: SinkKind,
    #[serde(flatten)]
    pub outcome: DeliveryOutcome,
}
