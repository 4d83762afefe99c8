//! Utilities for logging.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::FmtSubscriber;

/// How log lines should be formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggingMode {
    /// Human readable output, includes file and line numbers.
    #[default]
    Pretty,
    /// One json object per line.
    Json,
}

fn env_filter(default_level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

/// Configure the global logger.
///
/// `RUST_LOG` takes precedence over `default_level`. Returns false if a
/// global subscriber was already installed.
pub fn configure_global_logger(default_level: Level, mode: LoggingMode) -> bool {
    let builder = FmtSubscriber::builder()
        .with_env_filter(env_filter(default_level))
        .with_file(true)
        .with_line_number(true);

    let result = match mode {
        LoggingMode::Pretty => tracing::subscriber::set_global_default(builder.finish()),
        LoggingMode::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };

    result.is_ok()
}

/// Install a subscriber that writes through the test harness.
///
/// Safe to call from every test, only the first call has an effect.
pub fn init_test() {
    let subscriber = FmtSubscriber::builder()
        .with_test_writer()
        .with_env_filter(env_filter(Level::DEBUG))
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
