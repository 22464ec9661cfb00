use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where completed sessions are kept and how much of the history `coderush stats` shows
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatisticsConfig {
    /// Store every completed session. Abandoned sessions are never stored.
    pub save_enabled: bool,
    /// Number of recent sessions listed by `coderush stats`
    pub history_limit: usize,
    /// One JSON file per session is written here. Defaults to `<data_dir>/statistics`.
    pub directory: Option<PathBuf>,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            save_enabled: true,
            history_limit: 10,
            directory: None,
        }
    }
}
