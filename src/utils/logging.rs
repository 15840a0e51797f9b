//! Tracing subscriber setup.
//!
//! Logs always go to stderr so they never interleave with chat output on
//! stdout. `RUST_LOG`, when set, takes precedence over the configured level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchboard={level},warn")))
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(level: &str, json: bool) -> bool {
    let registry = tracing_subscriber::registry().with(filter(level));

    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    result.is_ok()
}
