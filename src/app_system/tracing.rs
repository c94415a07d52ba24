use tracing_subscriber::EnvFilter;

/// Installs the global subscriber: compact output with uptime timestamps.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies.
pub fn setup_tracing(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
