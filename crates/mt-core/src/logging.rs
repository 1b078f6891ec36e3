//! Logging for an order run.
//!
//! Everything the flows log (connection, symbol resolution, each poll at
//! debug level, the prepared order, warnings about stop-loss / take-profit
//! placement, the broker's answer) goes through `tracing` to stdout and, when
//! a log directory is configured, to a daily-rotated file named after the
//! run's `module_name` (see [`AppConfig::module_name`]).
//!
//! The live bid line shown while waiting is not a log event: the wait loop
//! writes it straight to stderr so it can be overwritten in place.
//!
//! `RUST_LOG` overrides the level passed on the command line. HTTP client
//! internals are capped at `warn` unless `RUST_LOG` says otherwise, so a
//! debug run shows the poll loop rather than connection-pool chatter.
//!
//! [`AppConfig::module_name`]: crate::config::AppConfig::module_name

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose logs are capped at `warn` by default.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

/// Filter directive for `log_level` with the HTTP stack kept quiet.
pub fn filter_directive(log_level: &str) -> String {
    let mut directive = log_level.to_string();
    for target in QUIET_TARGETS {
        directive.push_str(&format!(",{target}=warn"));
    }
    directive
}

/// Install the global subscriber. Call once, before connecting.
///
/// - `log_level`: default filter if `RUST_LOG` is not set (e.g. `"info"`)
/// - `log_dir`: directory for the daily log file, if any
/// - `module_name`: log file prefix, from the run config
pub fn init_logging(log_level: &str, log_dir: Option<&str>, module_name: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    let console_layer = fmt::layer().with_target(true).with_ansi(true);

    if let Some(dir) = log_dir {
        let file_appender = tracing_appender::rolling::daily(dir, module_name);
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();
    }
}
