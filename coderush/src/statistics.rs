use std::fs;
use std::path::{Path, PathBuf};

use rushline::{SessionResult, SessionResultSink};
use thiserror::Error;
use tracing::{debug, error, warn};
use web_time::SystemTime;

pub use progress::{LanguageProgress, OverallStats};

mod progress;

const FILE_PREFIX: &str = "session_";
const FILE_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum StatisticsError {
    #[error("Failed to create statistics directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to read statistics: {0}")]
    ReadFile(std::io::Error),

    #[error("Failed to write statistics file: {0}")]
    WriteFile(std::io::Error),

    #[error("Failed to remove statistics file: {0}")]
    RemoveFile(std::io::Error),

    #[error("Failed to parse statistics: {0}")]
    Parse(serde_json::Error),
}

/// Stores one JSON file per completed session
#[derive(Debug)]
pub struct StatisticsManager {
    directory: PathBuf,
}

impl StatisticsManager {
    pub fn new(directory: PathBuf) -> Result<Self, StatisticsError> {
        if !directory.exists() {
            fs::create_dir_all(&directory).map_err(StatisticsError::CreateDirectory)?;
        }
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write a result to its own file, named after its completion time
    pub fn save(&self, result: &SessionResult) -> Result<PathBuf, StatisticsError> {
        let millis = result
            .completed_at
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        let mut file_path = self
            .directory
            .join(format!("{FILE_PREFIX}{millis}.{FILE_EXTENSION}"));
        let mut suffix = 1;
        while file_path.exists() {
            file_path = self
                .directory
                .join(format!("{FILE_PREFIX}{millis}_{suffix}.{FILE_EXTENSION}"));
            suffix += 1;
        }

        let json = serde_json::to_string_pretty(result).map_err(StatisticsError::Parse)?;
        fs::write(&file_path, json).map_err(StatisticsError::WriteFile)?;

        debug!(path = %file_path.display(), "saved session result");
        Ok(file_path)
    }

    /// Load every stored result, newest first
    ///
    /// Files that cannot be parsed are skipped.
    pub fn load_all(&self) -> Result<Vec<SessionResult>, StatisticsError> {
        let mut results = Vec::new();

        for path in self.session_files()? {
            let content = fs::read_to_string(&path).map_err(StatisticsError::ReadFile)?;
            match serde_json::from_str::<SessionResult>(&content) {
                Ok(result) => results.push(result),
                Err(error) => warn!(path = %path.display(), %error, "skipping invalid statistics file"),
            }
        }

        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(results)
    }

    /// Delete every stored result. Returns the number of files removed.
    pub fn clear(&self) -> Result<usize, StatisticsError> {
        let files = self.session_files()?;
        for path in &files {
            fs::remove_file(path).map_err(StatisticsError::RemoveFile)?;
        }

        debug!(count = files.len(), "cleared statistics");
        Ok(files.len())
    }

    /// All stored results as a JSON array, oldest first
    pub fn export(&self) -> Result<String, StatisticsError> {
        let mut results = self.load_all()?;
        results.reverse();
        serde_json::to_string_pretty(&results).map_err(StatisticsError::Parse)
    }

    /// Replace the stored results with those of an exported JSON array
    ///
    /// The whole array is validated and written before the old files are removed. If a write
    /// fails, the files written so far are removed again and the old results stay in place.
    /// Returns the number of results imported.
    pub fn import(&self, json: &str) -> Result<usize, StatisticsError> {
        let results: Vec<SessionResult> =
            serde_json::from_str(json).map_err(StatisticsError::Parse)?;
        let old_files = self.session_files()?;

        let mut written = Vec::with_capacity(results.len());
        for result in &results {
            match self.save(result) {
                Ok(path) => written.push(path),
                Err(error) => {
                    for path in &written {
                        if let Err(error) = fs::remove_file(path) {
                            warn!(path = %path.display(), %error, "failed to roll back imported file");
                        }
                    }
                    return Err(error);
                }
            }
        }

        for path in &old_files {
            fs::remove_file(path).map_err(StatisticsError::RemoveFile)?;
        }

        debug!(count = results.len(), replaced = old_files.len(), "imported statistics");
        Ok(results.len())
    }

    fn session_files(&self) -> Result<Vec<PathBuf>, StatisticsError> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.directory).map_err(StatisticsError::ReadFile)? {
            let path = entry.map_err(StatisticsError::ReadFile)?.path();
            let is_session_file = path.is_file()
                && path.extension().is_some_and(|ext| ext == FILE_EXTENSION)
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(FILE_PREFIX));

            if is_session_file {
                files.push(path);
            }
        }

        Ok(files)
    }
}

impl SessionResultSink for StatisticsManager {
    fn store(&mut self, result: SessionResult) {
        if let Err(error) = self.save(&result) {
            error!(%error, "failed to save session result");
        }
    }
}
