//! Tracing setup for the `remus` binary.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "REMUS_LOG";

/// Filter used when neither `REMUS_LOG` nor the configuration sets one.
pub const DEFAULT_LOG_FILTER: &str = "remus=info";

static INIT: Once = Once::new();

/// Install the global subscriber. Only the first call has any effect.
///
/// `REMUS_LOG` (e.g. `REMUS_LOG=remus::compose=debug`) takes precedence over
/// `default_filter`. Log lines go to stderr; stdout carries command output.
pub fn init_tracing(default_filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
