// src/telemetry.rs
// Logging setup: RUST_LOG wins, otherwise info for everything.
// Logs go to stderr so `--json` output on stdout stays machine-readable.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,data_gatherer=debug"
    } else {
        "info"
    };

    // try_init: a second call (e.g. from tests) is a harmless no-op
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
