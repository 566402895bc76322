//! Logging setup for the tabclean binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to whoever embeds it. The binary calls [`init`], which logs to stderr and,
//! when asked, to a daily-rotated file as well.
//!
//! ## Usage
//!
//! ```no_run
//! use tabclean::logging::{self, LogOptions};
//!
//! // Keep the guard alive until exit so buffered file output is flushed.
//! let _guard = logging::init(&LogOptions { verbose: true, log_dir: None })?;
//! tracing::info!("Cleaning started");
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! `RUST_LOG` overrides the default level (`info`, or `debug` with
//! `verbose`).

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// How the binary wants to log.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Raise the default level from `info` to `debug`
    pub verbose: bool,
    /// Also write rotated log files here
    pub log_dir: Option<PathBuf>,
}

/// Default log directory following platform conventions.
///
/// Returns:
/// - Windows: `%APPDATA%/tabclean/logs`
/// - macOS: `~/Library/Application Support/tabclean/logs`
/// - Linux: `~/.local/share/tabclean/logs`
pub fn default_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    Ok(base_dir.join("tabclean").join("logs"))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    Ok(())
}

fn env_filter(verbose: bool) -> Result<EnvFilter> {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .context("Failed to create env filter")
}

/// Install the global subscriber.
///
/// Returns the file writer's guard when file logging is on; dropping it
/// flushes and stops the background writer.
///
/// # Errors
///
/// Returns error if the log directory or file appender cannot be created,
/// or a global subscriber is already installed.
pub fn init(options: &LogOptions) -> Result<Option<WorkerGuard>> {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &options.log_dir {
        Some(dir) => {
            ensure_dir(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(10)
                .filename_prefix("tabclean")
                .filename_suffix("log")
                .build(dir)
                .context("Failed to create file appender")?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(options.verbose)?)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = &options.log_dir {
        tracing::debug!("Logging initialized, log directory: {}", dir.display());
    }
    Ok(guard)
}

/// Path of today's log file inside `log_dir`.
pub fn current_log_path(log_dir: &Path) -> PathBuf {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    log_dir.join(format!("tabclean.{today}.log"))
}
