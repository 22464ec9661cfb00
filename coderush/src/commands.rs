use std::fs;
use std::path::Path;

use rushline::{SessionResult, TypingSession};
use tracing::info;
use web_time::SystemTime;

use crate::app::{App, Outcome};
use crate::config::{Config, PracticeOverrides};
use crate::error::AppError;
use crate::library::{Lesson, LessonLibrary};
use crate::practice::{Practice, SessionRecorder};
use crate::statistics::{LanguageProgress, OverallStats, StatisticsManager};
use crate::utils::{format_age, format_clock};

/// Practice a lesson from the library
pub fn practice(
    config: &Config,
    language: &str,
    lesson: &str,
    overrides: &PracticeOverrides,
) -> Result<(), AppError> {
    let library = LessonLibrary::open(config.lessons_dir())?;
    run_lesson(config, library.load(language, lesson)?, overrides)
}

/// Practice any file
pub fn open(
    config: &Config,
    path: &Path,
    language: Option<String>,
    overrides: &PracticeOverrides,
) -> Result<(), AppError> {
    run_lesson(config, Lesson::from_file(path, language)?, overrides)
}

fn run_lesson(config: &Config, lesson: Lesson, overrides: &PracticeOverrides) -> Result<(), AppError> {
    let mut settings = config.settings.practice.clone();
    settings.apply(overrides)?;

    let session = TypingSession::new(&lesson.code, settings.mode.into())
        .with_configuration(settings.engine_config())
        .with_lesson(lesson.tag());

    if session.is_complete() {
        return Err(AppError::EmptyLesson {
            language: lesson.language,
            lesson: lesson.id,
        });
    }

    let store = if config.settings.statistic.save_enabled {
        Some(StatisticsManager::new(config.statistics_dir())?)
    } else {
        None
    };

    info!(
        language = %lesson.language,
        lesson = %lesson.id,
        mode = %settings.mode,
        "starting practice"
    );

    match App::new(Practice::new(session, SessionRecorder::new(store))).run()? {
        Outcome::Completed(result) => print!("{}", summary(&result)),
        Outcome::Abandoned => println!("Session abandoned, nothing was saved."),
    }

    Ok(())
}

/// List languages, or the lessons of one language
pub fn lessons(config: &Config, language: Option<&str>) -> Result<(), AppError> {
    let library = LessonLibrary::open(config.lessons_dir())?;

    let Some(language) = language else {
        let languages = library.languages()?;
        if languages.is_empty() {
            println!("No lessons yet. Add files under '{}'", library.root().display());
        }
        for language in languages {
            println!("{language}");
        }
        return Ok(());
    };

    for entry in library.lessons(language)? {
        println!("{}", entry.id);
    }
    Ok(())
}

/// Print progress rollups and the most recent sessions
pub fn stats(config: &Config, language: Option<&str>) -> Result<(), AppError> {
    let store = StatisticsManager::new(config.statistics_dir())?;
    let results = store.load_all()?;

    let report = stats_report(
        &results,
        language,
        config.settings.statistic.history_limit,
        SystemTime::now(),
    );
    print!("{report}");
    Ok(())
}

/// Write every stored result as JSON, to a file or stdout
pub fn export(config: &Config, path: Option<&Path>) -> Result<(), AppError> {
    let json = StatisticsManager::new(config.statistics_dir())?.export()?;

    match path {
        Some(path) => {
            fs::write(path, json)?;
            println!("Exported statistics to '{}'", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Replace stored results with an export
pub fn import(config: &Config, path: &Path) -> Result<(), AppError> {
    let json = fs::read_to_string(path)?;
    let count = StatisticsManager::new(config.statistics_dir())?.import(&json)?;
    println!("Imported {count} session(s)");
    Ok(())
}

pub fn clear(config: &Config) -> Result<(), AppError> {
    let count = StatisticsManager::new(config.statistics_dir())?.clear()?;
    println!("Removed {count} session(s)");
    Ok(())
}

/// Print the effective settings as TOML
pub fn show_config(config: &Config) -> Result<(), AppError> {
    println!("# {}", config.config_dir.join("settings.toml").display());
    print!("{}", toml::to_string_pretty(&config.settings)?);
    Ok(())
}

fn summary(result: &SessionResult) -> String {
    let mut lines = vec![
        format!(
            "{}/{} completed in {}",
            result.language,
            result.lesson_id,
            format_clock(result.time_spent)
        ),
        format!("  WPM: {}", result.wpm),
        format!("  Accuracy: {}%", result.accuracy),
        format!("  Mistakes: {}", result.mistakes),
    ];

    if !result.symbols_missed.is_empty() {
        let missed: String = result.symbols_missed.iter().collect();
        lines.push(format!("  Missed: {missed:?}"));
    }
    join_lines(&lines)
}

fn stats_report(
    results: &[SessionResult],
    language: Option<&str>,
    history_limit: usize,
    now: SystemTime,
) -> String {
    let mut lines = match language {
        Some(language) => {
            let progress = LanguageProgress::from_results(language, results);
            let last = progress
                .last_practiced
                .map(|then| format_age(then, now))
                .unwrap_or_else(|| "never".to_string());

            vec![
                progress.language.clone(),
                format!(
                    "  Sessions: {} ({} distinct lessons)",
                    progress.total_lessons, progress.completed_lessons
                ),
                format!("  Average WPM: {}", progress.average_wpm),
                format!("  Average accuracy: {}%", progress.average_accuracy),
                format!("  Time spent: {}", format_clock(progress.total_time_spent)),
                format!("  Last practiced: {last}"),
            ]
        }
        None => {
            let overall = OverallStats::from_results(results);

            vec![
                "Overall".to_string(),
                format!("  Lessons completed: {}", overall.total_lessons_completed),
                format!("  Average WPM: {}", overall.average_wpm),
                format!("  Average accuracy: {}%", overall.average_accuracy),
                format!("  Time spent: {}", format_clock(overall.total_time_spent)),
                format!("  Languages: {}", overall.languages_practiced.join(", ")),
            ]
        }
    };

    let recent: Vec<&SessionResult> = results
        .iter()
        .filter(|result| language.is_none_or(|language| result.language == language))
        .take(history_limit)
        .collect();

    if !recent.is_empty() {
        lines.push(String::new());
        lines.push("Recent sessions".to_string());
        lines.extend(recent.into_iter().map(|result| {
            format!(
                "  {:<24} {:>4} wpm {:>4}% {:>6}  {}",
                format!("{}/{}", result.language, result.lesson_id),
                result.wpm,
                result.accuracy,
                format_clock(result.time_spent),
                format_age(result.completed_at, now),
            )
        }));
    }

    join_lines(&lines)
}

/// Join lines with a newline after each one
fn join_lines(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}
