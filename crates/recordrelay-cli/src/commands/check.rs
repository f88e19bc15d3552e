use std::path::Path;

use anyhow::Context;
use recordrelay_engine::config::{parse_flow, validate_flow};
use recordrelay_engine::router::{parse_routing_flag, route};

/// Parse and validate a flow configuration without running it.
pub fn execute(flow_path: &Path) -> anyhow::Result<()> {
    let config = parse_flow(flow_path)
        .with_context(|| format!("loading flow {}", flow_path.display()))?;

    validate_flow(&config).with_context(|| format!("flow '{}' is invalid", config.flow))?;

    let sink = route(parse_routing_flag(config.delivery.route_to_store.as_deref()));

    println!("flow '{}' is valid (routes to {})", config.flow, sink.as_str());
    Ok(())
}
