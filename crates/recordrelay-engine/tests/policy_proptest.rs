use proptest::prelude::*;
use recordrelay_engine::config::{parse_flow_str, validate_flow};
use recordrelay_engine::router::{parse_routing_flag, route};
use recordrelay_types::SinkKind;

proptest! {
    /// Routing is a pure function of the normalized flag: only a trimmed,
    /// case-insensitive "true" ever selects the store.
    #[test]
    fn routing_flag_parse_is_canonical(raw in "\\PC{0,16}") {
        let expected = raw.trim().eq_ignore_ascii_case("true");
        let parsed = parse_routing_flag(Some(&raw));
        prop_assert_eq!(parsed, expected);
        prop_assert_eq!(
            route(parsed),
            if expected { SinkKind::Store } else { SinkKind::Http }
        );
    }

    /// Whitespace decoration never changes the routing decision.
    #[test]
    fn routing_flag_ignores_surrounding_whitespace(
        pad_left in "[ \\t\\n]{0,4}",
        pad_right in "[ \\t\\n]{0,4}",
        upper in any::<bool>(),
    ) {
        let word = if upper { "TRUE" } else { "true" };
        let raw = format!("{pad_left}{word}{pad_right}");
        prop_assert!(parse_routing_flag(Some(&raw)));
    }

    /// The store section is required exactly when the flag routes to the
    /// store; the http section is required otherwise.
    #[test]
    fn sink_sections_match_the_routing_flag(to_store in any::<bool>()) {
        let flag = if to_store { "true" } else { "false" };
        let yaml = format!(
            r#"
flow: prop_routing_policy
source:
  format: xml
  entity: BusinessPartner
mapping:
  key:
    path: InternalID
    target: externalId
delivery:
  route_to_store: "{flag}"
  store:
    name: ContactPersons
"#
        );

        let config = parse_flow_str(&yaml).expect("generated yaml must parse");
        let result = validate_flow(&config);

        if to_store {
            prop_assert!(result.is_ok());
        } else {
            // HTTP path selected but no http section configured
            prop_assert!(result.is_err());
        }
    }
}
