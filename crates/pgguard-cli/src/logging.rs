//! Logging setup for the pgguard binary
//!
//! Console output goes to stderr so JSON reports on stdout stay clean.
//! When enabled, a second layer writes JSON lines to a daily rolling file.

use crate::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "debug";

/// Picks the filter directive: `--verbose` wins over the configured level
pub fn filter_directive(config: &LoggingConfig, verbose: bool) -> &str {
    if verbose {
        VERBOSE_FILTER
    } else {
        &config.level
    }
}

/// Initializes the global subscriber.
///
/// RUST_LOG takes precedence over both the configured level and
/// `--verbose`. The returned guard flushes the file writer on drop and must
/// live until the program exits.
pub fn init(config: &LoggingConfig, verbose: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config, verbose)));

    let mut layers = Vec::new();

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .compact()
        .with_filter(env_filter.clone())
        .boxed();
    layers.push(console_layer);

    let mut guard = None;
    if config.json_file {
        std::fs::create_dir_all(&config.log_dir)?;

        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "pgguard.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        json_file = config.json_file,
        log_dir = %config.log_dir.display(),
        "Logging initialized"
    );

    Ok(guard)
}
