//! Shared record model, delivery results, and the flow error taxonomy.
//!
//! Pure data types used by the engine, the store backend, and the CLI.
//! Kept in one crate so the store and engine crates can share them without
//! circular dependencies.

pub mod delivery;
pub mod error;
pub mod record;

pub use delivery::{DeliveryOutcome, DeliveryResult, SinkKind, StoreName};
pub use error::FlowError;
pub use record::{CanonicalRecord, FieldValue};
