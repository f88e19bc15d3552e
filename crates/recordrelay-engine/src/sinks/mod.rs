//! Delivery sinks: keyed persistent store and remote HTTP endpoint.

pub mod http;
pub mod store;

pub use http::HttpSink;
pub use store::StoreSink;
