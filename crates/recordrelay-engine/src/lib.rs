//! Transform-route-deliver pipeline core.
//!
//! One invocation takes an inbound document (XML or JSON string), extracts
//! the target entity occurrences, maps each into a canonical record via a
//! table-driven field mapping, routes the whole batch to exactly one sink
//! (keyed store or HTTP endpoint), and returns a result summary. Any stage
//! failure aborts the run: the original payload is preserved as a
//! diagnostic attachment and a single wrapping error is surfaced.

pub mod config;
pub mod diagnostics;
pub mod document;
pub mod errors;
pub mod extract;
pub mod mapping;
pub mod result;
pub mod router;
pub mod runner;
pub mod sinks;

// Re-export public API for convenience
pub use errors::RunError;
pub use result::RunSummary;
pub use runner::{run_flow, FlowRunner};
