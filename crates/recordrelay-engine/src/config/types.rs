//! Typed flow configuration.
//!
//! One flow = one source document shape, one mapping table, one delivery
//! section. Every optional value has a documented default here rather than
//! a null-coalescing chain at the point of use.

use std::path::PathBuf;

use serde::Deserialize;

/// Format of the inbound document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Xml,
    Json,
}

impl DocumentFormat {
    /// Mime type used when attaching payloads of this format.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Xml => "application/xml",
            Self::Json => "application/json",
        }
    }
}

/// Top-level flow configuration, parsed from YAML after env substitution.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    #[serde(default = "default_version")]
    pub version: String,
    /// Flow name, used in logs and the run summary.
    pub flow: String,
    /// Absent only for connect-only probe flows.
    #[serde(default)]
    pub source: Option<SourceConfig>,
    /// Absent only for connect-only probe flows.
    #[serde(default)]
    pub mapping: Option<MappingConfig>,
    pub delivery: DeliveryConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Where records come from: document format plus the entity marker to
/// search for (tag/field name, namespace-insensitive, any depth).
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub format: DocumentFormat,
    pub entity: String,
}

/// Table-driven mapping from one raw entity occurrence to one canonical
/// record. Reused unchanged for every entity kind; only the table differs.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingConfig {
    /// Primary key rule, applied first. An empty resolved key fails the
    /// whole batch.
    pub key: KeyRule,
    #[serde(default)]
    pub fields: Vec<FieldRule>,
    #[serde(default)]
    pub collections: Vec<CollectionRule>,
}

/// Source path and target name of the primary identifying key.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyRule {
    pub path: String,
    pub target: String,
}

/// One field rename with its default-on-absent rule and optional coercion.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldRule {
    /// Slash-separated child steps relative to the record node.
    pub path: String,
    pub target: String,
    /// Substituted when the path resolves to nothing. Never null.
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub coerce: Coercion,
}

/// Type coercion applied to a resolved field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coercion {
    #[default]
    None,
    /// `true` iff the trimmed source text equals "true" case-insensitively.
    Boolean,
}

/// Nested sub-record list under a record (e.g. file variants of an asset).
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionRule {
    /// Entity marker of the nested occurrences, searched under the record
    /// node at any depth.
    pub entity: String,
    /// Target field name holding the nested record list.
    pub target: String,
    /// When set, each nested record receives the parent key under this name.
    #[serde(default)]
    pub inherit_key_as: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldRule>,
}

/// Delivery section: routing flag plus settings for both sinks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryConfig {
    /// Boolean-like routing flag. Canonical parse rule: trim then
    /// case-insensitive compare to "true". Absent means the HTTP path.
    #[serde(default)]
    pub route_to_store: Option<String>,
    #[serde(default)]
    pub store: Option<StoreSettings>,
    #[serde(default)]
    pub http: Option<HttpSettings>,
}

/// Keyed store sink settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Named store the batch writes into.
    pub name: String,
    /// SQLite database file backing the store.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".recordrelay/store.db")
}

/// HTTP sink delivery shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpMode {
    /// One request per record: `POST <base>/<entity_path>/<key>`.
    #[default]
    PerRecord,
    /// One request for the whole batch: `POST <base>/<entity_path>`.
    Batch,
    /// Connect-only probe: single unauthenticated GET, no records involved.
    Probe,
}

/// HTTP sink settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub base_url: String,
    pub entity_path: String,
    /// Basic-auth credential pair. Typically `${ENV}`-substituted.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// JSON envelope name wrapping the record list, e.g. "CP" or "Assets".
    #[serde(default)]
    pub envelope: String,
    #[serde(default)]
    pub mode: HttpMode,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    15
}

fn default_read_timeout() -> u64 {
    30
}
