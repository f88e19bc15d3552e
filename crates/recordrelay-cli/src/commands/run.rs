use std::path::Path;

use anyhow::Context;
use recordrelay_engine::config::parse_flow;
use recordrelay_engine::run_flow;

/// Execute a flow against one inbound document and emit the result
/// summary as the outbound document.
pub fn execute(flow_path: &Path, input_path: Option<&Path>, output: Option<&Path>) -> anyhow::Result<()> {
    let config = parse_flow(flow_path)
        .with_context(|| format!("loading flow {}", flow_path.display()))?;

    let input = match input_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading input document {}", path.display()))?,
        // Probe flows run without an inbound document.
        None => String::new(),
    };

    tracing::info!(flow = %config.flow, "starting flow run");

    let document = run_flow(&input, config)?;

    match output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("writing result document {}", path.display()))?;
            tracing::info!(path = %path.display(), "result document written");
        }
        None => println!("{document}"),
    }

    Ok(())
}
