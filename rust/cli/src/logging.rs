//! Tracing setup for the binary. Logs go to stderr so stdout stays
//! machine-readable.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    // A subscriber may already be installed when embedded in tests
    let _ = tracing::subscriber::set_global_default(subscriber);
}
