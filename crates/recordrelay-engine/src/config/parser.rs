//! Flow YAML parsing with environment variable substitution.

use std::path::Path;
use std::sync::LazyLock;

use recordrelay_types::FlowError;
use regex::Regex;

use crate::config::types::FlowConfig;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var regex"));

/// Substitute `${VAR_NAME}` patterns with environment variable values.
///
/// # Errors
///
/// Returns [`FlowError::Configuration`] if any referenced environment
/// variable is not set; all missing names are reported together.
pub fn substitute_env_vars(input: &str) -> Result<String, FlowError> {
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in ENV_VAR_RE.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if !errors.is_empty() {
        return Err(FlowError::Configuration(format!(
            "missing environment variable(s): {}",
            errors.join(", ")
        )));
    }

    Ok(result)
}

/// Parse a flow YAML string (after env var substitution).
///
/// # Errors
///
/// Returns [`FlowError::Configuration`] if env var substitution fails or
/// the YAML is invalid.
pub fn parse_flow_str(yaml_str: &str) -> Result<FlowConfig, FlowError> {
    let substituted = substitute_env_vars(yaml_str)?;
    serde_yaml::from_str(&substituted)
        .map_err(|e| FlowError::Configuration(format!("failed to parse flow YAML: {e}")))
}

/// Parse a flow YAML file.
///
/// # Errors
///
/// Returns [`FlowError::Configuration`] if the file cannot be read or the
/// YAML is invalid.
pub fn parse_flow(path: &Path) -> Result<FlowConfig, FlowError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        FlowError::Configuration(format!("failed to read flow file {}: {e}", path.display()))
    })?;
    parse_flow_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RR_TEST_USER", "svc-account");
        let input = "username: ${RR_TEST_USER}\nenvelope: CP";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("svc-account"));
        assert!(!result.contains("${RR_TEST_USER}"));
        std::env::remove_var("RR_TEST_USER");
    }

    #[test]
    fn test_no_env_vars_passthrough() {
        let input = "base_url: https://api.example.com";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_multiple_missing_env_vars_all_reported() {
        let input = "${RR_MISSING_X} and ${RR_MISSING_Y}";
        let err = substitute_env_vars(input).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("RR_MISSING_X"));
        assert!(msg.contains("RR_MISSING_Y"));
    }

    #[test]
    fn test_parse_flow_from_string() {
        std::env::set_var("RR_TEST_PASS", "secret");
        let yaml = r#"
version: "1.0"
flow: contacts
source:
  format: xml
  entity: BusinessPartner
mapping:
  key:
    path: InternalID
    target: externalId
  fields:
    - path: Common/Person/Name/GivenName
      target: firstName
delivery:
  http:
    base_url: https://api.example.com
    entity_path: contacts
    username: svc
    password: ${RR_TEST_PASS}
    envelope: CP
"#;
        let config = parse_flow_str(yaml).unwrap();
        assert_eq!(config.flow, "contacts");
        let http = config.delivery.http.unwrap();
        assert_eq!(http.password, "secret");
        assert_eq!(http.envelope, "CP");
        std::env::remove_var("RR_TEST_PASS");
    }

    #[test]
    fn test_parse_invalid_yaml_errors() {
        let result = parse_flow_str("this is not: [valid: yaml: {{{}}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_flow_file_not_found() {
        let result = parse_flow(Path::new("/nonexistent/flow.yaml"));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("failed to read flow file"));
    }
}
