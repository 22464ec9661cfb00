//! # Normalize Module - Canonical Text for Stable Comparison
//!
//! Source snippets arrive with whatever line endings, tabs and typographic quotes their author's
//! editor produced. Normalization maps them onto the characters a user can actually type, so
//! comparisons never fail on an invisible difference.
//!
//! Steps, applied in order:
//!
//! 1. `\r\n` and lone `\r` become `\n`
//! 2. Each tab becomes two spaces
//! 3. Curly double quotes become `"`, curly single quotes and apostrophes become `'`
//! 4. *(optional)* Runs of two or more spaces collapse into one
//! 5. *(optional)* Trailing spaces and no-break spaces are stripped
//!
//! ```rust
//! use rushline::normalize::{NormalizeOptions, normalize};
//!
//! let raw = "print(\u{201C}hi\u{201D})\r\n\tx  = 1  ";
//! assert_eq!(normalize(raw, NormalizeOptions::exact()), "print(\"hi\")\n  x  = 1  ");
//! assert_eq!(normalize(raw, NormalizeOptions::forgiving()), "print(\"hi\")\n x = 1");
//! ```
//!
//! Normalization is total and idempotent for any fixed set of options.

use crate::NO_BREAK_SPACE;

/// Optional normalization steps
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Replace every run of two or more spaces with a single space
    pub collapse_space_runs: bool,
    /// Strip trailing space and no-break-space characters
    pub ignore_trailing_space: bool,
}

impl NormalizeOptions {
    /// Only the unconditional steps. Used wherever exact reproduction is required.
    pub const fn exact() -> Self {
        Self {
            collapse_space_runs: false,
            ignore_trailing_space: false,
        }
    }

    /// All steps enabled
    pub const fn forgiving() -> Self {
        Self {
            collapse_space_runs: true,
            ignore_trailing_space: true,
        }
    }

    /// Options for a single windowed line: forgiving unless the session is strict
    pub const fn for_strictness(strict: bool) -> Self {
        if strict {
            Self::exact()
        } else {
            Self::forgiving()
        }
    }
}

/// Returns true for an ordinary space or a no-break space
pub const fn is_space_like(char: char) -> bool {
    matches!(char, ' ' | NO_BREAK_SPACE)
}

/// Strips trailing space and no-break-space characters
pub fn trim_trailing_space(string: &str) -> &str {
    string.trim_end_matches(is_space_like)
}

/// Maps typographic quotes to their straight equivalents
const fn straighten_quote(char: char) -> char {
    match char {
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
        other => other,
    }
}

/// Canonicalize raw source text
///
/// Never fails. Running it twice with the same options yields the same string as running it once.
pub fn normalize(raw: &str, options: NormalizeOptions) -> String {
    let mut output = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    let push_space = |output: &mut String| {
        if !(options.collapse_space_runs && output.ends_with(' ')) {
            output.push(' ');
        }
    };

    while let Some(char) = chars.next() {
        match char {
            // "\r\n" is emitted by its '\n'
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' => output.push('\n'),
            '\t' => {
                push_space(&mut output);
                push_space(&mut output);
            }
            ' ' => push_space(&mut output),
            other => output.push(straighten_quote(other)),
        }
    }

    if options.ignore_trailing_space {
        let trimmed_len = trim_trailing_space(&output).len();
        output.truncate(trimmed_len);
    }

    output
}
