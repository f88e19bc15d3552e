use tracing_subscriber::EnvFilter;

/// Initialize structured logging for the recordrelay binary.
///
/// `RUST_LOG` takes precedence when set. Otherwise the given level is
/// applied to the recordrelay crates only, keeping dependency noise out
/// of flow run output.
pub fn init(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

fn default_directives(log_level: &str) -> String {
    format!(
        "recordrelay={log_level},recordrelay_engine={log_level},recordrelay_store={log_level}"
    )
}
