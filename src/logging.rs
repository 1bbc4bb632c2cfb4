//! Log output for the `santa` binary
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the binary. `RUST_LOG` wins over the `-v` count when set.

use tracing::Subscriber;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter directive for a given `-v` count.
pub fn directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build the filter: `RUST_LOG` if present and valid, else the `-v` level.
pub fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(verbosity)))
}

/// Stderr `fmt` subscriber behind `filter`, not yet installed.
pub fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
}

/// Install the stderr subscriber globally.
///
/// Calling this more than once is harmless; later calls keep the first
/// subscriber.
pub fn init(verbosity: u8) {
    let _ = subscriber(filter(verbosity)).try_init();
}
