//! Flow configuration: typed structs, YAML parsing, semantic validation.

pub mod parser;
pub mod types;
pub mod validator;

pub use parser::{parse_flow, parse_flow_str};
pub use types::{
    CollectionRule, Coercion, DeliveryConfig, DocumentFormat, FieldRule, FlowConfig,
    HttpMode, HttpSettings, KeyRule, MappingConfig, SourceConfig, StoreSettings,
};
pub use validator::validate_flow;
