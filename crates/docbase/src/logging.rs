//! Tracing subscriber setup.
//!
//! Logs go to stderr so command output on stdout stays parseable.
//! `RUST_LOG` wins over `[logging].level` when set.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

pub fn init(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.to_ascii_lowercase()));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
