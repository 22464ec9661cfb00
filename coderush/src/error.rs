use derive_more::From;
use thiserror::Error;

use crate::{
    config::ConfigError, library::LibraryError, logging::LoggingError,
    statistics::StatisticsError,
};

/// Anything that can end a command early
#[derive(Debug, From, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Library(LibraryError),

    #[error(transparent)]
    Statistics(StatisticsError),

    #[error(transparent)]
    Logging(LoggingError),

    #[error("I/O error: {0}")]
    Io(std::io::Error),

    #[error("Failed to print settings: {0}")]
    Serialize(toml::ser::Error),

    #[error("Lesson '{language}/{lesson}' has no text to type")]
    #[from(skip)]
    EmptyLesson { language: String, lesson: String },
}
