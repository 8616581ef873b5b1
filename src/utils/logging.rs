//! Diagnostic logging setup.
//!
//! Report output goes to stdout; diagnostics go to stderr through `tracing`
//! so they never mix with a report that is piped elsewhere. The level comes
//! from `RUST_LOG` and defaults to `warn`.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // try_init: tests and repeated calls must not panic on an installed subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
