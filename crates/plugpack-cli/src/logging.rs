//! Log output for the CLI
//!
//! Events go to stderr so `plan` output on stdout stays valid JSON.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "plugpack=info,plugpack_core=info,plugpack_bundle=info,plugpack_cli=info";
const VERBOSE_FILTER: &str =
    "plugpack=debug,plugpack_core=debug,plugpack_bundle=debug,plugpack_cli=debug";

/// Install the global subscriber. `RUST_LOG` wins unless `verbose` is set.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    // Ignore a second initialization
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
