//! Tracing subscriber setup
//!
//! Logs go to stderr so stdout carries only command output.

use std::env;
use std::io;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

const LOG_FILTER: &str = "RUST_LOG";

fn verbosity_level(verbosity: u8) -> Option<LevelFilter> {
    match verbosity {
        0 => None,
        1 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` sets the filter, default `warn`. `-v` and `-vv` override it with
/// debug and trace.
pub fn init_tracing(verbosity: u8) -> anyhow::Result<()> {
    let env_filter = match env::var_os(LOG_FILTER) {
        Some(_) => EnvFilter::try_from_default_env()
            .map_err(|e| anyhow::anyhow!("Invalid `{LOG_FILTER}` provided: {e}"))?,
        None => EnvFilter::new("warn"),
    };

    let builder = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_level(true)
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .with_target(false)
        .with_writer(io::stderr);

    let installed = match verbosity_level(verbosity) {
        Some(level) => builder.with_max_level(level).try_init(),
        None => builder.try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_level(0), None);
        assert_eq!(verbosity_level(1), Some(LevelFilter::DEBUG));
        assert_eq!(verbosity_level(5), Some(LevelFilter::TRACE));
    }
}
