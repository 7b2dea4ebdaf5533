//! Logging utilities for the Slotify service.
//!
//! This module provides the single place where the tracing subscriber is
//! assembled: console output, an optional rolling log file and, on Linux,
//! an optional journald sink.

use slotify_config::LoggingConfig;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix for the daily rolling log file.
const LOG_FILE_PREFIX: &str = "slotify.log";

/// Initialize the tracing subscriber from configuration.
///
/// `RUST_LOG` takes precedence over `config.level`. When a log directory is configured the
/// returned guard must be kept alive for the lifetime of the process, otherwise buffered
/// file output is dropped.
///
/// Calling this more than once is harmless; only the first call installs a subscriber.
///
/// # Examples
///
/// ```
/// use slotify_common::logging;
/// use slotify_config::LoggingConfig;
///
/// let _guard = logging::init(&LoggingConfig::default());
/// ```
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let (file_layer, guard) = match config.directory.as_deref() {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    #[cfg(target_os = "linux")]
    let journald_layer = if config.journald {
        match tracing_journald::layer() {
            Ok(layer) => Some(layer),
            Err(e) => {
                eprintln!("journald logging requested but unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };
    #[cfg(not(target_os = "linux"))]
    let journald_layer: Option<tracing_subscriber::layer::Identity> = None;

    // Use try_init to handle the case where a global default subscriber has already been set
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(file_layer)
        .with(journald_layer)
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!(
            level = %config.level,
            directory = ?config.directory,
            journald = config.journald,
            "Logging initialized"
        );
    }

    guard
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result, allowing this function to be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => tracing::error!("{}: {}", error_context, e),
    }
    result
}
