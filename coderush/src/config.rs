use std::path::{Path, PathBuf};

use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use practice::{PracticeConfig, PracticeMode, PracticeOverrides};
pub use stats::StatisticsConfig;

pub mod practice;
pub mod stats;

/// Prefix of environment variables that override settings, e.g. `CODERUSH_PRACTICE__STRICT`
const ENV_PREFIX: &str = "CODERUSH_";

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub practice: PracticeConfig,
    pub statistic: StatisticsConfig,
    pub lessons_dir: Option<PathBuf>,
}

#[derive(Debug, From, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to create directory '{directory}': {error}")]
    #[from(skip)]
    CreateDirectory {
        directory: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),

    #[error("Invalid window size {0}: must be an odd number of at least 1")]
    #[from(skip)]
    InvalidWindowSize(usize),
}

/// Resolved settings and the directories they were loaded from
#[derive(Debug)]
pub struct Config {
    pub settings: Settings,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    /// Load settings from defaults, `settings.toml` and the environment, in that order
    ///
    /// With an `override_path` both settings and data live in that directory. Otherwise the
    /// platform's configuration and data directories are used.
    pub fn get(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Grab default configuration
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        let (config_dir, data_dir) = match override_path {
            Some(path) => (path.clone(), path),
            None => ProjectDirs::from("com", "CodeRush", "CodeRush")
                .map(|dirs| (dirs.config_dir().to_path_buf(), dirs.data_dir().to_path_buf()))
                .ok_or(ConfigError::NoDirectory)?,
        };

        ensure_directory(&config_dir)?;

        let settings_toml = config_dir.join("settings.toml");
        if settings_toml.exists() {
            debug!(path = %settings_toml.display(), "merging settings file");
            figment = figment.merge(Toml::file(settings_toml));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut settings: Settings = figment.extract().map_err(Box::new)?;
        settings.practice.validate()?;

        settings
            .lessons_dir
            .get_or_insert_with(|| config_dir.join("lessons"));
        settings
            .statistic
            .directory
            .get_or_insert_with(|| data_dir.join("statistics"));

        Ok(Self {
            settings,
            config_dir,
            data_dir,
        })
    }

    pub fn lessons_dir(&self) -> PathBuf {
        self.settings
            .lessons_dir
            .clone()
            .unwrap_or_else(|| self.config_dir.join("lessons"))
    }

    pub fn statistics_dir(&self) -> PathBuf {
        self.settings
            .statistic
            .directory
            .clone()
            .unwrap_or_else(|| self.data_dir.join("statistics"))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Create a directory and its parents if missing
pub fn ensure_directory(directory: &Path) -> Result<(), ConfigError> {
    if directory.exists() {
        return Ok(());
    }

    std::fs::create_dir_all(directory).map_err(|error| ConfigError::CreateDirectory {
        directory: directory.to_path_buf(),
        error,
    })
}
