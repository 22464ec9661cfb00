//! # Math Module - Live Speed and Accuracy
//!
//! Metrics are derived from three counts over the typed text of a unit: how many characters were
//! typed, how many of them exactly match the target, and how many space-delimited words they
//! form. Those counts are collected in a [`Tally`], which adds up across the units of a session,
//! and turned into a [`MetricsSnapshot`] together with the elapsed time.
//!
//! Accuracy always uses exact character equality, even when live feedback is forgiving about
//! whitespace, so the score stays comparable between sessions.
//!
//! ```rust
//! use rushline::math::MetricsSnapshot;
//! use web_time::Duration;
//!
//! let metrics = MetricsSnapshot::compute("for i in", "for x in", Some(Duration::from_secs(6)));
//! assert_eq!(metrics.mistakes, 1);
//! assert_eq!(metrics.accuracy, 88); // 7 of 8 characters
//! assert_eq!(metrics.wpm, 30); // 3 words in a tenth of a minute
//! ```

use std::ops::{Add, AddAssign};

use web_time::Duration;

use crate::{Float, minutes};

/// Character and word counts for typed text
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Characters typed
    pub typed: usize,
    /// Typed characters exactly matching the target at the same position
    pub correct: usize,
    /// Space-delimited words in the typed text
    pub words: usize,
}

impl Tally {
    /// Count the typed text against its target
    pub fn measure(typed: &str, target: &str) -> Self {
        let correct = typed
            .chars()
            .zip(target.chars())
            .filter(|(typed, target)| typed == target)
            .count();

        Self {
            typed: typed.chars().count(),
            correct,
            words: word_count(typed),
        }
    }

    /// Typed characters that are not correct, overflow included
    pub const fn mistakes(&self) -> usize {
        self.typed.saturating_sub(self.correct)
    }
}

impl Add for Tally {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            typed: self.typed + other.typed,
            correct: self.correct + other.correct,
            words: self.words + other.words,
        }
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Metrics handed to the host after every change to the typed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    /// Words per minute, rounded
    pub wpm: u32,
    /// Percentage of typed characters that are correct, rounded. Always within 0..=100.
    pub accuracy: u32,
    /// Typed characters that are not correct
    pub mistakes: usize,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            wpm: 0,
            accuracy: 100,
            mistakes: 0,
        }
    }
}

impl MetricsSnapshot {
    /// Compute metrics for typed text against a target
    ///
    /// * `typed` - Everything typed for the unit so far
    /// * `target` - The unit's target text
    /// * `elapsed` - Active typing time, or `None` if the clock has not started
    pub fn compute(typed: &str, target: &str, elapsed: Option<Duration>) -> Self {
        Self::from_tally(&Tally::measure(typed, target), elapsed)
    }

    /// Compute metrics from already collected counts
    pub fn from_tally(tally: &Tally, elapsed: Option<Duration>) -> Self {
        Self {
            wpm: words_per_minute(tally.words, elapsed),
            accuracy: accuracy_percent(tally.correct, tally.typed),
            mistakes: tally.mistakes(),
        }
    }
}

/// Count space-delimited words
///
/// Splits on a literal space and counts every token, empty ones included, so `"a  b"` has three
/// words. The empty string has none.
pub fn word_count(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    text.split(' ').count()
}

/// Calculate words per minute
///
/// Returns 0 when the clock has not started or no time has passed.
pub fn words_per_minute(words: usize, elapsed: Option<Duration>) -> u32 {
    let Some(elapsed) = elapsed else {
        return 0;
    };

    let minutes = minutes(elapsed.as_secs_f64());
    if minutes <= 0.0 {
        return 0;
    }

    (words as Float / minutes).round() as u32
}

/// Calculate the accuracy percentage
///
/// Defined as 100 when nothing has been typed.
pub fn accuracy_percent(correct: usize, typed: usize) -> u32 {
    if typed == 0 {
        return 100;
    }

    let correct = correct.min(typed) as Float;
    (100.0 * correct / typed as Float).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tally_measure() {
        let tally = Tally::measure("cap", "cat");
        assert_eq!(tally.typed, 3);
        assert_eq!(tally.correct, 2);
        assert_eq!(tally.words, 1);
        assert_eq!(tally.mistakes(), 1);
    }

    #[test]
    fn test_tally_counts_overflow_as_mistakes() {
        let tally = Tally::measure("catdog", "cat");
        assert_eq!(tally.correct, 3);
        assert_eq!(tally.mistakes(), 3);
    }

    #[test]
    fn test_tally_uses_exact_equality() {
        // A no-break space is forgiven in live feedback, never in scoring
        let tally = Tally::measure("a b", "a\u{00A0}b");
        assert_eq!(tally.correct, 2);
        assert_eq!(tally.mistakes(), 1);
    }

    #[test]
    fn test_tally_add() {
        let mut total = Tally::measure("ab", "ab");
        total += Tally::measure("x y", "x z");
        assert_eq!(
            total,
            Tally {
                typed: 5,
                correct: 4,
                words: 3
            }
        );
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("word"), 1);
        assert_eq!(word_count("two words"), 2);
        assert_eq!(word_count("a  b"), 3);
        assert_eq!(word_count("trailing "), 2);
        // Newlines do not split words
        assert_eq!(word_count("a\nb"), 1);
    }

    #[test]
    fn test_words_per_minute() {
        assert_eq!(words_per_minute(10, Some(Duration::from_secs(60))), 10);
        assert_eq!(words_per_minute(10, Some(Duration::from_secs(30))), 20);
        assert_eq!(words_per_minute(1, Some(Duration::from_secs(7))), 9); // 8.57
        assert_eq!(words_per_minute(10, None), 0);
        assert_eq!(words_per_minute(10, Some(Duration::ZERO)), 0);
    }

    #[test]
    fn test_accuracy_percent() {
        assert_eq!(accuracy_percent(0, 0), 100);
        assert_eq!(accuracy_percent(3, 3), 100);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(0, 5), 0);
    }

    #[test]
    fn test_no_input_snapshot() {
        let metrics = MetricsSnapshot::compute("", "print(x)", Some(Duration::from_secs(10)));
        assert_eq!(metrics, MetricsSnapshot::default());
    }

    proptest! {
        #[test]
        fn test_accuracy_bounds(typed in "[a-c ]{0,20}", target in "[a-c ]{0,20}") {
            let metrics = MetricsSnapshot::compute(&typed, &target, Some(Duration::from_secs(1)));
            prop_assert!(metrics.accuracy <= 100);
            if typed.is_empty() {
                prop_assert_eq!(metrics.accuracy, 100);
            }
        }
    }
}
