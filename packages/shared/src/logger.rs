//! Logging setup utilities for the TCP chat server.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive for the server library and the binary.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
fn default_filter(binary_name: &str, default_log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "tcp_chat_server={},{}={}",
            default_log_level,
            binary_name.replace('-', "_"),
            default_log_level
        )
        .into()
    })
}

/// Initialize the tracing subscriber writing to stderr.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "tcp-chat")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use tcp_chat_shared::logger::setup_logger;
///
/// setup_logger("tcp-chat", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(default_filter(binary_name, default_log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Initialize the tracing subscriber appending plain-text lines to `path`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened for appending.
pub fn setup_file_logger(
    binary_name: &str,
    default_log_level: &str,
    path: &Path,
) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(default_filter(binary_name, default_log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();

    Ok(())
}
