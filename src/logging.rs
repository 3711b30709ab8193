use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter; `RUST_LOG` is the fallback.
pub const ENV_LOG: &str = "BFRUN_LOG";

/// Install the stderr subscriber. Defaults to `warn` when no filter is set.
pub fn init() {
    let filter = std::env::var(ENV_LOG)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    // Try to initialize, ignore error if already initialized
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
