use std::path::{Path, PathBuf};

use rushline::LessonTag;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, ensure_directory};

/// Language used for files without an extension
const FALLBACK_LANGUAGE: &str = "text";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Failed to open lessons directory: {0}")]
    Create(ConfigError),

    #[error("Failed to read lessons directory '{directory}': {error}")]
    ReadDirectory {
        directory: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to read lesson '{path}': {error}")]
    ReadFile {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("No lessons found for language '{0}'")]
    UnknownLanguage(String),

    #[error("No lesson '{lesson}' found for language '{language}'")]
    UnknownLesson { language: String, lesson: String },
}

/// A lesson file found in the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonEntry {
    pub id: String,
    pub path: PathBuf,
}

/// A loaded lesson, ready to practice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub language: String,
    pub id: String,
    pub code: String,
}

impl Lesson {
    /// Load any file as a lesson
    ///
    /// The lesson id is the file stem. Without an explicit language, the file extension is used.
    pub fn from_file(path: &Path, language: Option<String>) -> Result<Self, LibraryError> {
        let code = read_lesson(path)?;

        let language = language
            .or_else(|| file_name_part(path.extension()))
            .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string());
        let id = file_name_part(path.file_stem()).unwrap_or_else(|| "lesson".to_string());

        Ok(Self { language, id, code })
    }

    pub fn tag(&self) -> LessonTag {
        LessonTag::new(&self.language, &self.id)
    }
}

/// A directory of lessons laid out as `<language>/<lesson_id>.<ext>`
#[derive(Debug)]
pub struct LessonLibrary {
    root: PathBuf,
}

impl LessonLibrary {
    /// Open the library, creating its directory if missing
    pub fn open(root: PathBuf) -> Result<Self, LibraryError> {
        ensure_directory(&root).map_err(LibraryError::Create)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of all languages with a lesson directory, sorted
    pub fn languages(&self) -> Result<Vec<String>, LibraryError> {
        let mut languages: Vec<String> = read_directory(&self.root)?
            .into_iter()
            .filter(|path| path.is_dir())
            .filter_map(|path| file_name_part(path.file_name()))
            .collect();

        languages.sort();
        Ok(languages)
    }

    /// All lessons of a language, sorted by id
    pub fn lessons(&self, language: &str) -> Result<Vec<LessonEntry>, LibraryError> {
        let directory = self.root.join(language);
        if !directory.is_dir() {
            return Err(LibraryError::UnknownLanguage(language.to_string()));
        }

        let mut lessons: Vec<LessonEntry> = read_directory(&directory)?
            .into_iter()
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let id = file_name_part(path.file_stem())?;
                Some(LessonEntry { id, path })
            })
            .collect();

        lessons.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(language, count = lessons.len(), "scanned lessons");
        Ok(lessons)
    }

    /// Load a lesson by language and id
    pub fn load(&self, language: &str, id: &str) -> Result<Lesson, LibraryError> {
        let entry = self
            .lessons(language)?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| LibraryError::UnknownLesson {
                language: language.to_string(),
                lesson: id.to_string(),
            })?;

        Ok(Lesson {
            language: language.to_string(),
            id: entry.id,
            code: read_lesson(&entry.path)?,
        })
    }
}

fn read_directory(directory: &Path) -> Result<Vec<PathBuf>, LibraryError> {
    let read_error = |error| LibraryError::ReadDirectory {
        directory: directory.to_path_buf(),
        error,
    };

    let mut paths = Vec::new();
    for entry in directory.read_dir().map_err(read_error)? {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(error) => warn!(directory = %directory.display(), %error, "skipping unreadable entry"),
        }
    }

    Ok(paths)
}

fn read_lesson(path: &Path) -> Result<String, LibraryError> {
    std::fs::read_to_string(path).map_err(|error| LibraryError::ReadFile {
        path: path.to_path_buf(),
        error,
    })
}

fn file_name_part(part: Option<&std::ffi::OsStr>) -> Option<String> {
    part.and_then(|part| part.to_str()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn library_with(files: &[(&str, &str)]) -> (tempfile::TempDir, LessonLibrary) {
        let dir = tempdir().unwrap();
        for (path, content) in files {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let library = LessonLibrary::open(dir.path().to_path_buf()).unwrap();
        (dir, library)
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("lessons");
        let library = LessonLibrary::open(root.clone()).unwrap();

        assert!(root.is_dir());
        assert!(library.languages().unwrap().is_empty());
    }

    #[test]
    fn test_languages_are_sorted() {
        let (_dir, library) = library_with(&[
            ("rust/hello.rs", "fn main() {}"),
            ("python/hello.py", "print('hi')"),
            ("notes.txt", "not a language"),
        ]);

        assert_eq!(library.languages().unwrap(), vec!["python", "rust"]);
    }

    #[test]
    fn test_lessons_and_load() {
        let (_dir, library) = library_with(&[
            ("python/loops.py", "for i in range(3):\n    print(i)\n"),
            ("python/basics.py", "x = 1\n"),
        ]);

        let ids: Vec<_> = library
            .lessons("python")
            .unwrap()
            .into_iter()
            .map(|entry| entry.id)
            .collect();
        assert_eq!(ids, vec!["basics", "loops"]);

        let lesson = library.load("python", "basics").unwrap();
        assert_eq!(lesson.code, "x = 1\n");
        assert_eq!(lesson.tag(), LessonTag::new("python", "basics"));
    }

    #[test]
    fn test_unknown_language_and_lesson() {
        let (_dir, library) = library_with(&[("go/main.go", "package main")]);

        assert!(matches!(
            library.lessons("cobol"),
            Err(LibraryError::UnknownLanguage(language)) if language == "cobol"
        ));
        assert!(matches!(
            library.load("go", "missing"),
            Err(LibraryError::UnknownLesson { .. })
        ));
    }

    #[test]
    fn test_lesson_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snippet.rs");
        fs::write(&path, "let x = 1;").unwrap();

        let lesson = Lesson::from_file(&path, None).unwrap();
        assert_eq!(lesson.language, "rs");
        assert_eq!(lesson.id, "snippet");

        let lesson = Lesson::from_file(&path, Some("rust".to_string())).unwrap();
        assert_eq!(lesson.language, "rust");

        assert!(matches!(
            Lesson::from_file(&dir.path().join("missing.rs"), None),
            Err(LibraryError::ReadFile { .. })
        ));
    }
}
