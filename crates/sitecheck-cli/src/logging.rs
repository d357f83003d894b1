//! Tracing subscriber setup
//!
//! Logs go to stderr so `--format json` keeps stdout clean. `RUST_LOG`
//! overrides the level picked from `-v`/`-q`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::CliConfig;

/// Filter from `RUST_LOG`, or the verbosity default
#[must_use]
pub fn env_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_directive()))
}

/// Install the global subscriber; a second call is a no-op
pub fn init(config: &CliConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));
    let result = if config.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(config.color.should_color())
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    };
    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing already initialized");
    }
}
