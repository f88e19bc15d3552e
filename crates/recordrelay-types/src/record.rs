//! Canonical record model.
//!
//! A [`CanonicalRecord`] is the validated, renamed, typed output of mapping
//! one raw entity occurrence. Fields are an ordered flat map; values are
//! text, booleans, or nested record lists. Records are immutable once the
//! mapper has built them; nothing downstream mutates a field.

use std::collections::BTreeMap;

use crate::error::FlowError;

/// Value of one canonical record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain text. Absent source fields resolve to `Text("")`, never null.
    Text(String),
    /// Coerced boolean flag.
    Bool(bool),
    /// Nested sub-records (e.g. file variants under an asset).
    Records(Vec<CanonicalRecord>),
}

impl FieldValue {
    /// Convert to a JSON value. Lossless over all variants.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Records(rs) => {
                serde_json::Value::Array(rs.iter().map(CanonicalRecord::to_json).collect())
            }
        }
    }

    fn from_json(value: &serde_json::Value, key_field: &str) -> Result<Self, FlowError> {
        match value {
            serde_json::Value::String(s) => Ok(Self::Text(s.clone())),
            serde_json::Value::Bool(b) => Ok(Self::Bool(*b)),
            serde_json::Value::Array(items) => {
                let records = items
                    .iter()
                    .map(|item| CanonicalRecord::from_json(item, key_field))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Records(records))
            }
            other => Err(FlowError::Configuration(format!(
                "unsupported field value in record JSON: {other}"
            ))),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One validated, mapped business record.
///
/// Invariant: `key` is non-empty after trimming. The mapper enforces this
/// before construction; [`CanonicalRecord::new`] is only reachable with a
/// resolved key.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    key: String,
    fields: BTreeMap<String, FieldValue>,
}

impl CanonicalRecord {
    /// Create an empty record addressed by `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// The primary identifying key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Set a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Look up a field by target name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// All fields in deterministic (sorted) order.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Serialize to the documented JSON shape: a flat object of field
    /// name → value, nested records as arrays of objects.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }

    /// Parse a record back from its JSON shape, re-resolving the primary
    /// key from `key_field`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::MissingRequiredField`] when `key_field` is
    /// absent or empty, or [`FlowError::Configuration`] on a non-object or
    /// an unsupported value type.
    pub fn from_json(value: &serde_json::Value, key_field: &str) -> Result<Self, FlowError> {
        let obj = value.as_object().ok_or_else(|| {
            FlowError::Configuration("record JSON must be an object".to_string())
        })?;

        let key = obj
            .get(key_field)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .unwrap_or("");
        if key.is_empty() {
            return Err(FlowError::MissingRequiredField {
                field: key_field.to_string(),
            });
        }

        let mut record = Self::new(key);
        for (name, raw) in obj {
            record
                .fields
                .insert(name.clone(), FieldValue::from_json(raw, key_field)?);
        }
        Ok(record)
    }
}
