use std::collections::HashSet;

use rushline::SessionResult;
use web_time::SystemTime;

/// Rollup of all sessions practiced in one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProgress {
    pub language: String,
    /// Number of recorded sessions
    pub total_lessons: usize,
    /// Number of distinct lessons practiced
    pub completed_lessons: usize,
    pub average_wpm: u32,
    pub average_accuracy: u32,
    /// Seconds
    pub total_time_spent: u64,
    pub last_practiced: Option<SystemTime>,
}

impl LanguageProgress {
    pub fn from_results(language: &str, results: &[SessionResult]) -> Self {
        let results: Vec<&SessionResult> = results
            .iter()
            .filter(|result| result.language == language)
            .collect();

        let completed_lessons = results
            .iter()
            .map(|result| result.lesson_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            language: language.to_string(),
            total_lessons: results.len(),
            completed_lessons,
            average_wpm: rounded_mean(results.iter().map(|result| result.wpm)),
            average_accuracy: rounded_mean(results.iter().map(|result| result.accuracy)),
            total_time_spent: results.iter().map(|result| result.time_spent).sum(),
            last_practiced: results.iter().map(|result| result.completed_at).max(),
        }
    }
}

/// Rollup across every language
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OverallStats {
    pub average_wpm: u32,
    pub average_accuracy: u32,
    /// Seconds
    pub total_time_spent: u64,
    /// Number of distinct (language, lesson) pairs
    pub total_lessons_completed: usize,
    /// In the order they first appear in the results
    pub languages_practiced: Vec<String>,
}

impl OverallStats {
    pub fn from_results(results: &[SessionResult]) -> Self {
        let mut languages_practiced: Vec<String> = Vec::new();
        for result in results {
            if !languages_practiced.contains(&result.language) {
                languages_practiced.push(result.language.clone());
            }
        }

        let total_lessons_completed = results
            .iter()
            .map(|result| (result.language.as_str(), result.lesson_id.as_str()))
            .collect::<HashSet<_>>()
            .len();

        Self {
            average_wpm: rounded_mean(results.iter().map(|result| result.wpm)),
            average_accuracy: rounded_mean(results.iter().map(|result| result.accuracy)),
            total_time_spent: results.iter().map(|result| result.time_spent).sum(),
            total_lessons_completed,
            languages_practiced,
        }
    }
}

/// Mean rounded to the nearest integer. Zero for no values.
fn rounded_mean(values: impl Iterator<Item = u32>) -> u32 {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), value| {
        (sum + u64::from(value), count + 1)
    });

    if count == 0 {
        return 0;
    }

    (sum as f64 / count as f64).round() as u32
}
