//! Semantic validation for parsed flow configuration values.
//!
//! Runs once at pipeline entry; all problems are collected and reported in
//! a single error rather than failing on the first.

use recordrelay_types::FlowError;

use crate::config::types::{FieldRule, FlowConfig, HttpMode, MappingConfig};
use crate::router::parse_routing_flag;

fn validate_field_rules(rules: &[FieldRule], context: &str, errors: &mut Vec<String>) {
    for (i, rule) in rules.iter().enumerate() {
        if rule.path.trim().is_empty() {
            errors.push(format!("{context}: field {i} has an empty source path"));
        }
        if rule.target.trim().is_empty() {
            errors.push(format!("{context}: field {i} has an empty target name"));
        }
    }
}

fn validate_mapping(mapping: &MappingConfig, errors: &mut Vec<String>) {
    if mapping.key.path.trim().is_empty() {
        errors.push("mapping key must have a source path".to_string());
    }
    if mapping.key.target.trim().is_empty() {
        errors.push("mapping key must have a target name".to_string());
    }
    validate_field_rules(&mapping.fields, "mapping", errors);
    for (i, coll) in mapping.collections.iter().enumerate() {
        if coll.entity.trim().is_empty() {
            errors.push(format!("collections[{i}] has an empty entity marker"));
        }
        if coll.target.trim().is_empty() {
            errors.push(format!("collections[{i}] has an empty target name"));
        }
        validate_field_rules(&coll.fields, &format!("collections[{i}]"), errors);
    }
}

/// Validate a parsed flow configuration.
/// Returns `Ok(())` if valid, Err with all validation errors if not.
///
/// # Errors
///
/// Returns [`FlowError::Configuration`] listing all validation failures
/// found in the flow config.
pub fn validate_flow(config: &FlowConfig) -> Result<(), FlowError> {
    let mut errors = Vec::new();

    if config.version != "1.0" {
        errors.push(format!(
            "unsupported flow version '{}', expected '1.0'",
            config.version
        ));
    }

    if config.flow.trim().is_empty() {
        errors.push("flow name must not be empty".to_string());
    }

    let use_store = parse_routing_flag(config.delivery.route_to_store.as_deref());
    let probe = !use_store
        && config
            .delivery
            .http
            .as_ref()
            .is_some_and(|h| h.mode == HttpMode::Probe);

    if use_store {
        match config.delivery.store.as_ref() {
            Some(store) if store.name.trim().is_empty() => {
                errors.push("store sink requires a non-empty store name".to_string());
            }
            Some(_) => {}
            None => errors.push(
                "routing flag selects the store sink but no store section is configured"
                    .to_string(),
            ),
        }
        if config
            .delivery
            .http
            .as_ref()
            .is_some_and(|h| h.mode == HttpMode::Probe)
        {
            errors.push("probe mode requires the HTTP path, not the store sink".to_string());
        }
    } else {
        match config.delivery.http.as_ref() {
            Some(http) => {
                if http.base_url.trim().is_empty() {
                    errors.push("http sink requires a non-empty base_url".to_string());
                }
                if http.entity_path.trim().is_empty() {
                    errors.push("http sink requires a non-empty entity_path".to_string());
                }
                if http.mode != HttpMode::Probe && http.envelope.trim().is_empty() {
                    errors.push("http sink requires a non-empty envelope name".to_string());
                }
                if http.connect_timeout_secs == 0 {
                    errors.push("connect_timeout_secs must be > 0".to_string());
                }
                if http.read_timeout_secs == 0 {
                    errors.push("read_timeout_secs must be > 0".to_string());
                }
            }
            None => errors.push(
                "routing flag selects the HTTP sink but no http section is configured".to_string(),
            ),
        }
    }

    if probe {
        // Connect-only flows carry no records; source/mapping are ignored.
    } else {
        match config.source.as_ref() {
            Some(source) if source.entity.trim().is_empty() => {
                errors.push("source entity marker must not be empty".to_string());
            }
            Some(_) => {}
            None => errors.push("source section is required".to_string()),
        }
        match config.mapping.as_ref() {
            Some(mapping) => validate_mapping(mapping, &mut errors),
            None => errors.push("mapping section is required".to_string()),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FlowError::Configuration(format!(
            "flow validation failed:\n  - {}",
            errors.join("\n  - ")
        )))
    }
}
