//! stderr logging for the CLI.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "PAGEPICK_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install a fmt subscriber filtered by `PAGEPICK_LOG` (default `warn`).
///
/// A second call, or a subscriber installed by the host, is left alone.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
