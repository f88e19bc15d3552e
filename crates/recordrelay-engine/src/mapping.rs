//! Record mapper: one raw occurrence in, exactly one canonical record out.
//!
//! Entirely table-driven; the same algorithm maps contacts, assets, and
//! material rows; only the field table differs. The primary key rule runs
//! first and an empty key fails the whole batch, since downstream sinks
//! assume every record is addressable.

use recordrelay_types::{CanonicalRecord, FieldValue, FlowError};

use crate::config::{Coercion, FieldRule, MappingConfig};
use crate::document::DocNode;
use crate::extract::RawRecord;

/// Map one raw record into a canonical record.
///
/// # Errors
///
/// Returns [`FlowError::MissingRequiredField`] when the primary key
/// resolves to nothing or to an empty string after trimming. No partial
/// record is produced.
pub fn map_record(raw: &RawRecord<'_>, mapping: &MappingConfig) -> Result<CanonicalRecord, FlowError> {
    let node = raw.node();

    let key = node
        .resolve_path(&mapping.key.path)
        .map(|n| n.text().trim().to_string())
        .unwrap_or_default();
    if key.is_empty() {
        return Err(FlowError::MissingRequiredField {
            field: mapping.key.target.clone(),
        });
    }

    let mut record = CanonicalRecord::new(key.clone());
    record.insert(mapping.key.target.clone(), key.clone());

    for rule in &mapping.fields {
        apply_field(node, rule, &mut record);
    }

    for coll in &mapping.collections {
        let mut subs = Vec::new();
        for child in node.find_all(&coll.entity) {
            let mut sub = CanonicalRecord::new(key.clone());
            if let Some(name) = &coll.inherit_key_as {
                sub.insert(name.clone(), key.clone());
            }
            for rule in &coll.fields {
                apply_field(child, rule, &mut sub);
            }
            subs.push(sub);
        }
        record.insert(coll.target.clone(), FieldValue::Records(subs));
    }

    Ok(record)
}

/// Resolve one field rule against a record node: rename, default-on-absent,
/// and the single documented coercion.
fn apply_field(node: &DocNode, rule: &FieldRule, record: &mut CanonicalRecord) {
    let resolved = node.resolve_path(&rule.path).map(|n| n.text().to_string());
    let value = match rule.coerce {
        Coercion::None => {
            FieldValue::Text(resolved.unwrap_or_else(|| rule.default.clone()))
        }
        Coercion::Boolean => FieldValue::Bool(
            resolved.is_some_and(|s| s.trim().eq_ignore_ascii_case("true")),
        ),
    };
    record.insert(rule.target.clone(), value);
}
