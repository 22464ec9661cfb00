//! # rushline - A typing-session engine for code typing trainers
//!
//! rushline compares what a user types against a snippet of source code, one keystroke at a
//! time. It classifies every position as correct, incorrect or pending, keeps live speed and
//! accuracy metrics, and reports a single result record when the snippet has been reproduced.
//!
//! The engine does no rendering and no storage. Hosts drive it through a small control surface
//! and receive plain data back: verdicts for colouring, metric snapshots for a status bar, and a
//! [`SessionResult`] handed to a [`SessionResultSink`] on completion.
//!
//! ## Practice modes
//!
//! - **Document**: the whole snippet is one unit and must be reproduced exactly.
//! - **Windowed**: the snippet is practiced one line at a time, with a sliding window of
//!   context lines. Lines auto-advance when complete and whitespace may be compared forgivingly.
//!
//! ## Example
//!
//! ```rust
//! use rushline::{TypingSession, Verdict};
//!
//! let mut session = TypingSession::document("let x = 1;");
//!
//! for ch in "let x = 2".chars() {
//!     session.insert_char(ch);
//! }
//! assert_eq!(session.alignment().verdicts()[8], Verdict::Incorrect);
//!
//! session.backspace();
//! session.insert_char('1');
//! session.insert_char(';');
//! assert!(session.is_complete());
//! ```

pub mod align;
pub mod clock;
pub mod config;
pub mod events;
pub mod math;
pub mod normalize;
pub mod render;
pub mod session;

pub use align::{Alignment, Verdict, align, char_equal, is_exact_match, is_line_complete};
pub use clock::{ManualTimeSource, SessionClock, SystemTimeSource, TimeSource};
pub use config::Configuration;
pub use events::{EventLog, SessionEvent, SessionObserver, SessionResult, SessionResultSink};
pub use math::{MetricsSnapshot, Tally};
pub use normalize::{NormalizeOptions, normalize};
pub use render::{Decoration, Decorations, LineWindow, WindowLine};
pub use session::{LessonTag, Mode, Phase, TypingSession};

/// Non-breaking space, treated like an ordinary space in forgiving comparisons
pub(crate) const NO_BREAK_SPACE: char = '\u{00A0}';

// Types for more general type-safety
type Seconds = f64;
type Minutes = f64;
type Float = f64;

// Get the minutes elapsed from a number of seconds
pub(crate) fn minutes(seconds: Seconds) -> Minutes {
    seconds / 60.0
}
