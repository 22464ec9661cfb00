//! # Render Module - Display Data Without a Widget
//!
//! Rendering is left entirely to the host. This module only projects session state into plain
//! data: one [`Decoration`] per displayed character and, in windowed mode, the [`LineWindow`] of
//! context lines around the active one.

use std::ops::Range;

use crate::align::{Alignment, Verdict};

/// Everything needed to draw one character of the active unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    /// The character to draw. For overflow positions this is the typed character.
    pub char: char,
    pub verdict: Verdict,
    /// The next typed character lands here
    pub has_cursor: bool,
    /// Typed past the end of the target
    pub is_overflow: bool,
    pub index: usize,
}

/// Iterator over the decorations of the active unit
///
/// Yields one item per alignment position: target characters first, then any overflow.
pub struct Decorations<'a> {
    alignment: &'a Alignment,
    target: Vec<char>,
    typed: Vec<char>,
    index: usize,
}

impl<'a> Decorations<'a> {
    pub(crate) fn new(alignment: &'a Alignment, target: &str, typed: &str) -> Self {
        Self {
            alignment,
            target: target.chars().collect(),
            typed: typed.chars().collect(),
            index: 0,
        }
    }

    /// Position of the cursor, which may be one past the last decoration
    pub fn cursor(&self) -> usize {
        self.typed.len()
    }
}

impl Iterator for Decorations<'_> {
    type Item = Decoration;

    fn next(&mut self) -> Option<Self::Item> {
        let verdict = *self.alignment.verdicts().get(self.index)?;
        let is_overflow = self.index >= self.target.len();

        let char = if is_overflow {
            self.typed.get(self.index)
        } else {
            self.target.get(self.index)
        }
        .copied()?;

        let decoration = Decoration {
            char,
            verdict,
            has_cursor: self.index == self.typed.len(),
            is_overflow,
            index: self.index,
        };

        self.index += 1;
        Some(decoration)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.alignment.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Decorations<'_> {}

impl std::iter::FusedIterator for Decorations<'_> {}

/// Range of line indices visible around `index`
///
/// Extends `window_size / 2` lines to each side of the active line, clamped to `0..line_count`.
/// A window size of zero is treated as one.
pub fn window_bounds(index: usize, line_count: usize, window_size: usize) -> Range<usize> {
    let half = window_size.max(1) / 2;
    let start = index.saturating_sub(half).min(line_count);
    let end = index.saturating_add(half).saturating_add(1).min(line_count);
    start..end
}

/// One line in the visible window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLine<'a> {
    /// Index into the session's lines
    pub index: usize,
    /// One-based line number for display
    pub number: usize,
    /// The line as it appears in the normalized source
    pub text: &'a str,
    pub is_active: bool,
}

/// The slice of lines shown around the active line in windowed mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineWindow<'a> {
    lines: &'a [String],
    range: Range<usize>,
    active: Option<usize>,
}

impl<'a> LineWindow<'a> {
    /// Project the window for a line index
    ///
    /// When `index` equals the number of lines the session is done and no line is active.
    pub fn new(lines: &'a [String], index: usize, window_size: usize) -> Self {
        Self {
            lines,
            range: window_bounds(index, lines.len(), window_size),
            active: (index < lines.len()).then_some(index),
        }
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Index of the active line, if the session is not done
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn iter(&self) -> impl Iterator<Item = WindowLine<'a>> + '_ {
        self.lines[self.range.clone()]
            .iter()
            .enumerate()
            .map(move |(offset, text)| {
                let index = self.range.start + offset;
                WindowLine {
                    index,
                    number: index + 1,
                    text,
                    is_active: self.active == Some(index),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;

    fn lines(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn test_window_bounds() {
        assert_eq!(window_bounds(0, 10, 3), 0..2);
        assert_eq!(window_bounds(5, 10, 3), 4..7);
        assert_eq!(window_bounds(9, 10, 3), 8..10);
        assert_eq!(window_bounds(5, 10, 5), 3..8);
        assert_eq!(window_bounds(5, 10, 1), 5..6);
        assert_eq!(window_bounds(5, 10, 0), 5..6);
        // Even sizes extend half the size to each side
        assert_eq!(window_bounds(5, 10, 4), 3..8);
    }

    #[test]
    fn test_window_bounds_when_done() {
        assert_eq!(window_bounds(10, 10, 3), 9..10);
        assert_eq!(window_bounds(0, 0, 3), 0..0);
    }

    #[test]
    fn test_line_window() {
        let lines = lines(5);
        let window = LineWindow::new(&lines, 2, 3);

        let visible: Vec<_> = window.iter().collect();
        assert_eq!(visible.len(), 3);
        assert_eq!(visible[0].text, "line 1");
        assert_eq!(visible[0].number, 2);
        assert!(!visible[0].is_active);
        assert!(visible[1].is_active);
        assert_eq!(window.active(), Some(2));
    }

    #[test]
    fn test_line_window_done() {
        let lines = lines(2);
        let window = LineWindow::new(&lines, 2, 3);
        assert_eq!(window.active(), None);
        assert_eq!(window.start(), 1);
        assert!(window.iter().all(|line| !line.is_active));
    }

    #[test]
    fn test_decorations() {
        let alignment = align("cx", "cat", false);
        let decorations: Vec<_> = Decorations::new(&alignment, "cat", "cx").collect();

        assert_eq!(decorations.len(), 3);
        assert_eq!(decorations[0].verdict, Verdict::Correct);
        assert_eq!(decorations[1].char, 'a');
        assert_eq!(decorations[1].verdict, Verdict::Incorrect);
        assert!(decorations[2].has_cursor);
        assert_eq!(decorations[2].verdict, Verdict::Pending);
    }

    #[test]
    fn test_decorations_overflow() {
        let alignment = align("cats!", "cat", false);
        let decorations = Decorations::new(&alignment, "cat", "cats!");
        assert_eq!(decorations.len(), 5);
        assert_eq!(decorations.cursor(), 5);

        let overflow: String = decorations
            .filter(|d| d.is_overflow)
            .map(|d| d.char)
            .collect();
        assert_eq!(overflow, "s!");
    }
}
