//! Console logging for the run binaries.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install a `tracing` subscriber filtered by `RUST_LOG`, defaulting to `info`
///
/// Only the first call has an effect; later calls, or a subscriber installed
/// elsewhere, leave the existing one in place.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    });
}
