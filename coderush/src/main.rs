use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::config::{Config, PracticeOverrides};
use crate::error::AppError;

mod app;
mod commands;
mod config;
mod error;
mod library;
mod logging;
mod practice;
mod statistics;
mod utils;

/// Practice typing real source code
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Directory holding settings, lessons and statistics
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Practice a lesson from the library
    Practice {
        language: String,
        lesson: String,
        #[command(flatten)]
        overrides: PracticeOverrides,
    },

    /// Practice any file
    Open {
        path: PathBuf,
        /// Language to record the session under (defaults to the file extension)
        #[arg(long)]
        language: Option<String>,
        #[command(flatten)]
        overrides: PracticeOverrides,
    },

    /// List languages, or the lessons of one language
    Lessons { language: Option<String> },

    /// Show progress and recent sessions
    Stats { language: Option<String> },

    /// Export statistics as JSON
    Export {
        /// Output file (stdout if omitted)
        path: Option<PathBuf>,
    },

    /// Replace statistics with an export
    Import { path: PathBuf },

    /// Delete all statistics
    Clear,

    /// Print the effective settings
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::get(cli.config)?;
    let _guard = logging::init(&config.log_dir())?;
    info!(command = ?cli.command, "starting coderush");

    let result = match cli.command {
        Command::Practice {
            language,
            lesson,
            overrides,
        } => commands::practice(&config, &language, &lesson, &overrides),
        Command::Open {
            path,
            language,
            overrides,
        } => commands::open(&config, &path, language, &overrides),
        Command::Lessons { language } => commands::lessons(&config, language.as_deref()),
        Command::Stats { language } => commands::stats(&config, language.as_deref()),
        Command::Export { path } => commands::export(&config, path.as_deref()),
        Command::Import { path } => commands::import(&config, &path),
        Command::Clear => commands::clear(&config),
        Command::Config => commands::show_config(&config),
    };

    if let Err(error) = &result {
        error!(%error, "command failed");
    }
    result
}
