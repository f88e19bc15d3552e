//! Sink router: one boolean-like flag selects the delivery strategy for
//! the whole batch.

use recordrelay_types::SinkKind;

/// Canonical boolean parse for the routing flag: trim, then
/// case-insensitive compare to "true". Absent is `false`: an unset flag
/// routes to HTTP rather than erroring.
#[must_use]
pub fn parse_routing_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|s| s.trim().eq_ignore_ascii_case("true"))
}

/// Pure routing function: `true` selects the store, anything else HTTP.
#[must_use]
pub fn route(use_store: bool) -> SinkKind {
    if use_store {
        SinkKind::Store
    } else {
        SinkKind::Http
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_is_pure_over_the_normalized_flag() {
        assert_eq!(route(true), SinkKind::Store);
        assert_eq!(route(false), SinkKind::Http);
    }

    #[test]
    fn absent_flag_routes_to_http() {
        assert!(!parse_routing_flag(None));
        assert_eq!(route(parse_routing_flag(None)), SinkKind::Http);
    }

    #[test]
    fn flag_parse_trims_and_ignores_case() {
        assert!(parse_routing_flag(Some("true")));
        assert!(parse_routing_flag(Some("TRUE")));
        assert!(parse_routing_flag(Some("  True \n")));
        assert!(!parse_routing_flag(Some("false")));
        assert!(!parse_routing_flag(Some("yes")));
        assert!(!parse_routing_flag(Some("1")));
        assert!(!parse_routing_flag(Some("")));
    }
}
