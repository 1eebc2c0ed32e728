//! Logging setup for the command-line binary.
//!
//! Events go to stderr through `tracing`, keeping stdout free for command
//! output. The default level is `info`; set `RUST_LOG` to override it.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. Call once at startup.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
