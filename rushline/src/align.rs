//! # Align Module - Position-by-Position Verdicts
//!
//! Compares the typed text against its target one character at a time and produces a
//! [`Verdict`] per position. The result is a pure function of `(typed, target, strict)`; it holds
//! no state and is recomputed after every keystroke.
//!
//! ```text
//! Target:   [c][a][t]
//! Typed:    [c][a][p][s]
//! Verdicts: [✓][✓][✗][✗]
//!                      └─ overflow: typed past the end of the target
//! ```
//!
//! ## Strictness
//!
//! In forgiving mode an ordinary space and a no-break space count as the same character. This
//! hides width differences in copied snippets without masking real mistakes. Strict mode requires
//! identical code points.

use crate::normalize::{is_space_like, trim_trailing_space};

/// Classification of a single position
///
/// `Pending` positions have not been typed yet. The ordering follows rendering priority.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verdict {
    /// Nothing typed at this position yet
    #[default]
    Pending,
    /// The typed character matches the target
    Correct,
    /// The typed character differs from the target, or there is no target character
    Incorrect,
}

/// Compare one typed character to one target character
///
/// Equal when the code points match, or when both are space-like and `strict` is false.
pub const fn char_equal(typed: char, target: char, strict: bool) -> bool {
    typed == target || (!strict && is_space_like(typed) && is_space_like(target))
}

/// The verdicts for one comparison unit
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// One verdict per position up to `max(typed_len, target_len)`
    verdicts: Vec<Verdict>,
    /// Character length of the target
    target_len: usize,
    /// Character length of the typed text
    typed_len: usize,
}

impl Alignment {
    /// All verdicts, including overflow positions
    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    /// Verdicts for positions that exist in the target
    pub fn target_verdicts(&self) -> &[Verdict] {
        &self.verdicts[..self.target_len.min(self.verdicts.len())]
    }

    /// Verdicts for characters typed past the end of the target. Always [`Verdict::Incorrect`].
    pub fn overflow(&self) -> &[Verdict] {
        &self.verdicts[self.target_len.min(self.verdicts.len())..]
    }

    /// Number of positions
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    /// Returns true if both the typed text and the target were empty
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// Character length of the target this alignment was computed against
    pub const fn target_len(&self) -> usize {
        self.target_len
    }

    /// Character length of the typed text this alignment was computed from
    pub const fn typed_len(&self) -> usize {
        self.typed_len
    }

    /// Number of [`Verdict::Correct`] positions
    pub fn correct_count(&self) -> usize {
        self.count(Verdict::Correct)
    }

    /// Number of [`Verdict::Incorrect`] positions, overflow included
    pub fn incorrect_count(&self) -> usize {
        self.count(Verdict::Incorrect)
    }

    fn count(&self, verdict: Verdict) -> usize {
        self.verdicts.iter().filter(|v| **v == verdict).count()
    }
}

/// Align typed text against its target
///
/// # Examples
///
/// ```rust
/// use rushline::align::{Verdict, align};
///
/// let alignment = align("cap", "cat", false);
/// assert_eq!(
///     alignment.verdicts(),
///     &[Verdict::Correct, Verdict::Correct, Verdict::Incorrect]
/// );
///
/// let alignment = align("ca", "cat", false);
/// assert_eq!(alignment.verdicts()[2], Verdict::Pending);
/// ```
pub fn align(typed: &str, target: &str, strict: bool) -> Alignment {
    let typed: Vec<char> = typed.chars().collect();
    let target: Vec<char> = target.chars().collect();
    let limit = typed.len().max(target.len());

    let verdicts = (0..limit)
        .map(|index| match (typed.get(index), target.get(index)) {
            (None, _) => Verdict::Pending,
            (Some(&typed), Some(&target)) if char_equal(typed, target, strict) => Verdict::Correct,
            (Some(_), _) => Verdict::Incorrect,
        })
        .collect();

    Alignment {
        verdicts,
        target_len: target.len(),
        typed_len: typed.len(),
    }
}

/// Whole-document completion test
///
/// Completion requires literal reproduction, even when live feedback is forgiving.
pub fn is_exact_match(typed: &str, target: &str) -> bool {
    typed == target
}

/// Windowed per-line completion test
///
/// When not strict, trailing whitespace is ignored on both sides. The remaining characters must
/// have equal length and compare equal under the active strictness.
pub fn is_line_complete(typed: &str, target: &str, strict: bool) -> bool {
    let (typed, target) = if strict {
        (typed, target)
    } else {
        (trim_trailing_space(typed), trim_trailing_space(target))
    };

    typed.chars().count() == target.chars().count()
        && typed
            .chars()
            .zip(target.chars())
            .all(|(typed, target)| char_equal(typed, target, strict))
}
