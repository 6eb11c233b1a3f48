//! File-based logging module for spotify-dl
//!
//! Log output goes to a file instead of stdout, since stdout carries the interactive
//! prompts and result tables.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "spotify-dl";
const DEFAULT_FILTER: &str = "spotify_dl=debug,librespot=info,rspotify=info,warn";

/// Initialize the logging system.
///
/// Logs are written to `<log_dir>/spotify-dl.YYYY-MM-DD.log` with daily rotation.
/// The log level can be controlled via the `RUST_LOG` environment variable.
///
/// Default log levels:
/// - `spotify_dl` modules: DEBUG
/// - `librespot`, `rspotify`: INFO
/// - Other crates: WARN
pub fn init_logging(log_dir: &Path) -> anyhow::Result<()> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);

    // Create a non-blocking writer to avoid blocking the async runtime
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes on drop; keep it for the lifetime of the process
    Box::leak(Box::new(guard));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI colors in log files
        .with_target(true) // Include module path
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Logging initialized - logs written to {}/", log_dir.display());

    Ok(())
}

/// Log a download request and its result
#[macro_export]
macro_rules! log_download_result {
    ($reference:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::info!(reference = %$reference, "Download finished"),
            Err(e) => tracing::error!(reference = %$reference, error = %e, "Download failed"),
        }
    };
}
