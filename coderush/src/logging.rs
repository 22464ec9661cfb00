use std::path::Path;

use derive_more::From;
use thiserror::Error;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

/// Environment variable holding the log filter, e.g. `CODERUSH_LOG=rushline=trace`
pub const LOG_ENV: &str = "CODERUSH_LOG";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, From, Error)]
pub enum LoggingError {
    #[error("Failed to open log file: {0}")]
    Appender(InitError),

    #[error("Failed to install logger: {0}")]
    Subscriber(TryInitError),
}

/// Send all logs to `<log_dir>/coderush.log`
///
/// The terminal belongs to the practice screen, so nothing is logged to stdout or stderr. Logs are
/// flushed until the returned guard is dropped.
pub fn init(log_dir: &Path) -> Result<WorkerGuard, LoggingError> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("coderush")
        .filename_suffix("log")
        .build(log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    Ok(guard)
}
