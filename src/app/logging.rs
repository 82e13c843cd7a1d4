use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Install the global subscriber: `RUST_LOG` filtering, output on stderr.
///
/// Stdout carries the report or emitted records only. Calling this twice is
/// harmless; the second call leaves the first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
