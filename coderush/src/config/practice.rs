use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// How a lesson is presented
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PracticeMode {
    /// Retype the whole lesson in one go
    Document,
    /// Retype one line at a time with surrounding context
    #[default]
    Windowed,
}

impl From<PracticeMode> for rushline::Mode {
    fn from(mode: PracticeMode) -> Self {
        match mode {
            PracticeMode::Document => Self::Document,
            PracticeMode::Windowed => Self::Windowed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PracticeConfig {
    pub mode: PracticeMode,
    pub strict: bool,
    pub window_size: usize,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            mode: PracticeMode::default(),
            strict: false,
            window_size: 3,
        }
    }
}

impl PracticeConfig {
    /// Window sizes must be odd so the active line sits in the middle
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 || self.window_size % 2 == 0 {
            return Err(ConfigError::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }

    /// Apply command line overrides for a single run
    pub fn apply(&mut self, overrides: &PracticeOverrides) -> Result<(), ConfigError> {
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if overrides.strict {
            self.strict = true;
        }
        if let Some(window_size) = overrides.window_size {
            self.window_size = window_size;
        }
        self.validate()
    }

    pub const fn engine_config(&self) -> rushline::Configuration {
        rushline::Configuration {
            strict: self.strict,
            window_size: self.window_size,
        }
    }
}

/// Practice settings that can be overridden from the command line
#[derive(Debug, Default, Clone, Args)]
pub struct PracticeOverrides {
    /// Present the lesson as a whole document or line by line
    #[arg(long, value_enum)]
    pub mode: Option<PracticeMode>,

    /// Require exact whitespace
    #[arg(long)]
    pub strict: bool,

    /// Number of lines shown in windowed mode (odd)
    #[arg(long)]
    pub window_size: Option<usize>,
}
