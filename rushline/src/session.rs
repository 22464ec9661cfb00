//! # Session Module - The Typing Session State Machine
//!
//! A [`TypingSession`] owns everything about one practice attempt: the normalized target text,
//! the typed buffer of the active unit, the session clock and the collaborators that receive its
//! events. Hosts drive it with a small control surface and read plain data back.
//!
//! ## Session Lifecycle
//!
#![doc = simple_mermaid::mermaid!("../diagrams/session_lifecycle.mmd")]
//!
//! The clock starts lazily on the first inserted character, so time spent looking at the snippet
//! before typing does not count. Pausing freezes the clock and rejects input until resumed.
//!
//! ## Modes
//!
//! In [`Mode::Document`] the whole snippet is a single unit which is complete once the typed text
//! is an exact copy of it. In [`Mode::Windowed`] every line of the snippet is a unit of its own.
//! A line counts as complete when it matches under the session's strictness, after which the
//! session advances to the next line on the following [`poll`](TypingSession::poll). The session
//! is complete once the last line has been advanced past.
//!
//! ## Usage
//!
//! ```rust
//! use rushline::{Phase, TypingSession};
//!
//! let mut session = TypingSession::windowed("a = 1\nb = 2");
//!
//! for ch in "a = 1".chars() {
//!     session.insert_char(ch);
//! }
//! // The advance is deferred so the finished line can be shown once more
//! assert_eq!(session.line_index(), 0);
//! assert!(session.poll());
//! assert_eq!(session.line_index(), 1);
//!
//! // Enter skips the rest of the line
//! session.insert_char('\n');
//! assert_eq!(session.phase(), Phase::Completed);
//! ```

use std::{collections::BTreeSet, fmt};

use tracing::{debug, trace};
use web_time::{Duration, SystemTime};

use crate::{
    align::{Alignment, Verdict, align, char_equal, is_exact_match, is_line_complete},
    clock::{SessionClock, SystemTimeSource, TimeSource},
    config::Configuration,
    events::{Emitter, SessionObserver, SessionResult, SessionResultSink},
    math::{MetricsSnapshot, Tally},
    normalize::{NormalizeOptions, normalize},
    render::{Decorations, LineWindow},
};

/// How the snippet is split into comparison units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The whole snippet is one unit, reproduced exactly
    Document,
    /// One line at a time, with a window of context lines
    Windowed,
}

/// Where a session is in its lifecycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing typed yet. The clock has not started.
    #[default]
    Idle,
    /// Accepting input with the clock running
    Active,
    /// Input is rejected and the clock is frozen
    Paused,
    /// Terminal until [`reset`](TypingSession::reset)
    Completed,
}

/// Identifies the lesson a session practices
///
/// Purely descriptive: copied into the [`SessionResult`] and never used for comparison.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct LessonTag {
    pub language: String,
    pub lesson_id: String,
}

impl LessonTag {
    pub fn new(language: impl Into<String>, lesson_id: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            lesson_id: lesson_id.into(),
        }
    }
}

/// A single typing practice attempt
///
/// Not thread-safe: a session and its collaborators live on one thread. Separate sessions share
/// no state.
pub struct TypingSession {
    mode: Mode,
    config: Configuration,
    lesson: LessonTag,
    /// Comparison units. One per line in windowed mode, a single unit otherwise.
    units: Vec<String>,
    /// Index of the active unit. Equals `units.len()` once done.
    unit_index: usize,
    /// Comparison target of the active unit
    target: String,
    /// Everything typed for the active unit
    typed: String,
    alignment: Alignment,
    phase: Phase,
    clock: SessionClock,
    time: Box<dyn TimeSource>,
    /// Set when a windowed line was completed but not advanced past yet
    pending_advance: bool,
    /// Counts of units already advanced past
    committed: Tally,
    missed: BTreeSet<char>,
    emitter: Emitter,
}

impl TypingSession {
    /// Create a session for a source snippet
    ///
    /// The source is normalized once with [`NormalizeOptions::exact`]. A source that is empty
    /// after normalization produces a session that is already [`Phase::Completed`] and never
    /// delivers a result.
    pub fn new(source: &str, mode: Mode) -> Self {
        let normalized = normalize(source, NormalizeOptions::exact());

        let units = match mode {
            _ if normalized.is_empty() => Vec::new(),
            Mode::Document => vec![normalized],
            Mode::Windowed => normalized.split('\n').map(String::from).collect(),
        };

        let mut session = Self {
            mode,
            config: Configuration::default(),
            lesson: LessonTag::default(),
            units,
            unit_index: 0,
            target: String::new(),
            typed: String::new(),
            alignment: Alignment::default(),
            phase: Phase::Idle,
            clock: SessionClock::new(),
            time: Box::new(SystemTimeSource),
            pending_advance: false,
            committed: Tally::default(),
            missed: BTreeSet::new(),
            emitter: Emitter::default(),
        };

        session.load_unit();
        if session.units.is_empty() {
            session.phase = Phase::Completed;
        }

        debug!(mode = ?mode, units = session.units.len(), "session created");
        session
    }

    /// Create a whole-document session
    pub fn document(source: &str) -> Self {
        Self::new(source, Mode::Document)
    }

    /// Create a line-windowed session
    pub fn windowed(source: &str) -> Self {
        Self::new(source, Mode::Windowed)
    }

    /// Configure the session with custom settings (builder pattern)
    ///
    /// ```rust
    /// use rushline::{Configuration, TypingSession};
    ///
    /// let session = TypingSession::windowed("x = 1  ").with_configuration(Configuration {
    ///     strict: true,
    ///     window_size: 5,
    /// });
    /// assert_eq!(session.target(), "x = 1  ");
    /// ```
    pub fn with_configuration(mut self, config: Configuration) -> Self {
        self.config = config;
        self.load_unit();
        self
    }

    /// Tag the session with the lesson it practices (builder pattern)
    pub fn with_lesson(mut self, lesson: LessonTag) -> Self {
        self.lesson = lesson;
        self
    }

    /// Read time from a custom source (builder pattern)
    pub fn with_time_source(mut self, time: impl TimeSource + 'static) -> Self {
        self.time = Box::new(time);
        self
    }

    /// Register an observer for typing changes and metrics (builder pattern)
    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.emitter.add_observer(Box::new(observer));
        self
    }

    /// Set the collaborator that receives the result on completion (builder pattern)
    pub fn with_result_sink(mut self, sink: impl SessionResultSink + 'static) -> Self {
        self.emitter.set_sink(Box::new(sink));
        self
    }

    /// Type a character into the active unit
    ///
    /// The first insertion starts the clock. In windowed mode `'\n'` acts as
    /// [`force_advance`](Self::force_advance). Other control characters are ignored.
    ///
    /// # Returns
    ///
    /// The verdict for the inserted character, or `None` if nothing was inserted
    ///
    /// ```rust
    /// use rushline::{TypingSession, Verdict};
    ///
    /// let mut session = TypingSession::document("hi");
    /// assert_eq!(session.insert_char('h'), Some(Verdict::Correct));
    /// assert_eq!(session.insert_char('o'), Some(Verdict::Incorrect));
    /// assert_eq!(session.insert_char('\u{7}'), None);
    /// ```
    pub fn insert_char(&mut self, char: char) -> Option<Verdict> {
        self.apply_pending_advance();
        if !self.accepts_input() {
            return None;
        }

        if char == '\n' && self.mode == Mode::Windowed {
            self.force_advance();
            return None;
        }
        if char.is_control() && char != '\n' {
            return None;
        }

        if self.phase == Phase::Idle {
            self.clock.start(self.time.now());
            self.set_phase(Phase::Active);
        }

        let position = self.typed.chars().count();
        let verdict = match self.target.chars().nth(position) {
            Some(expected) if char_equal(char, expected, self.config.strict) => Verdict::Correct,
            Some(expected) => {
                self.missed.insert(expected);
                Verdict::Incorrect
            }
            None => Verdict::Incorrect,
        };

        self.typed.push(char);
        self.refresh();
        trace!(?char, ?verdict, position, "character inserted");

        if self.unit_complete() {
            match self.mode {
                Mode::Document => self.finish(),
                Mode::Windowed => self.pending_advance = true,
            }
        }

        self.emit_update();
        Some(verdict)
    }

    /// Delete the last typed character of the active unit
    ///
    /// Never deletes past the start of the unit.
    ///
    /// # Returns
    ///
    /// The deleted character, or `None` if nothing was deleted
    pub fn backspace(&mut self) -> Option<char> {
        self.apply_pending_advance();
        if !self.accepts_input() {
            return None;
        }

        let deleted = self.typed.pop()?;
        self.refresh();
        trace!(?deleted, "character deleted");

        self.emit_update();
        Some(deleted)
    }

    /// Clear the typed text of the active unit
    ///
    /// Keeps the unit index and the clock. Returns true if anything was cleared.
    pub fn restart_unit(&mut self) -> bool {
        self.apply_pending_advance();
        if !self.accepts_input() || self.typed.is_empty() {
            return false;
        }

        self.typed.clear();
        self.refresh();
        debug!(unit = self.unit_index, "unit restarted");

        self.emit_update();
        true
    }

    /// Treat the active unit as complete, whatever was typed
    ///
    /// Does not start the clock. Returns true if the session moved on.
    pub fn force_advance(&mut self) -> bool {
        self.apply_pending_advance();
        if !self.accepts_input() {
            return false;
        }

        self.advance();
        true
    }

    /// Freeze the clock and reject input. Only valid while active.
    pub fn pause(&mut self) -> bool {
        self.apply_pending_advance();
        if self.phase != Phase::Active {
            return false;
        }

        self.clock.pause(self.time.now());
        self.set_phase(Phase::Paused);
        true
    }

    /// Continue after [`pause`](Self::pause)
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }

        self.clock.resume(self.time.now());
        self.set_phase(Phase::Active);
        self.apply_pending_advance();
        true
    }

    /// Start the attempt over from the first unit
    ///
    /// Clears all typed text, metrics and missed characters, stops the clock and allows the next
    /// completion to deliver a result of its own.
    pub fn reset(&mut self) {
        self.unit_index = 0;
        self.typed.clear();
        self.pending_advance = false;
        self.committed = Tally::default();
        self.missed.clear();
        self.clock.reset();
        self.emitter.rearm();
        self.load_unit();

        if self.units.is_empty() {
            self.set_phase(Phase::Completed);
            return;
        }

        self.set_phase(Phase::Idle);
        debug!("session reset");
        self.emit_update();
    }

    /// Apply a deferred line advance
    ///
    /// Returns true if the session moved to the next line.
    pub fn poll(&mut self) -> bool {
        self.apply_pending_advance()
    }

    /// Handle a timer tick
    ///
    /// Applies a deferred line advance and returns the elapsed time in whole seconds for display.
    pub fn tick(&mut self) -> u64 {
        self.apply_pending_advance();
        self.elapsed().map(|elapsed| elapsed.as_secs()).unwrap_or_default()
    }

    /// Verdicts for the active unit
    pub const fn alignment(&self) -> &Alignment {
        &self.alignment
    }

    /// Per-character display data for the active unit
    pub fn decorations(&self) -> Decorations<'_> {
        Decorations::new(&self.alignment, &self.target, &self.typed)
    }

    /// The lines around the active line. `None` in document mode.
    pub fn window(&self) -> Option<LineWindow<'_>> {
        match self.mode {
            Mode::Windowed => Some(LineWindow::new(
                &self.units,
                self.unit_index,
                self.config.window_size,
            )),
            Mode::Document => None,
        }
    }

    /// Live metrics over the whole session so far
    pub fn metrics(&self) -> MetricsSnapshot {
        let tally = self.committed + Tally::measure(&self.typed, &self.target);
        MetricsSnapshot::from_tally(&tally, self.elapsed())
    }

    /// Active typing time. `None` until the first character is inserted.
    pub fn elapsed(&self) -> Option<Duration> {
        self.clock.elapsed(self.time.now())
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Hosts should withhold input while this is true
    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    pub const fn lesson(&self) -> &LessonTag {
        &self.lesson
    }

    /// Typed text of the active unit
    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Comparison target of the active unit. Empty once done.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Index of the active line, or of the single document unit
    pub const fn line_index(&self) -> usize {
        self.unit_index
    }

    pub fn line_count(&self) -> usize {
        self.units.len()
    }

    /// Target characters mistyped at least once since the last reset
    pub const fn symbols_missed(&self) -> &BTreeSet<char> {
        &self.missed
    }

    fn accepts_input(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Active)
    }

    fn unit_complete(&self) -> bool {
        match self.mode {
            Mode::Document => is_exact_match(&self.typed, &self.target),
            Mode::Windowed => is_line_complete(&self.typed, &self.target, self.config.strict),
        }
    }

    fn apply_pending_advance(&mut self) -> bool {
        if !self.pending_advance || self.phase != Phase::Active {
            return false;
        }

        self.advance();
        true
    }

    fn advance(&mut self) {
        self.pending_advance = false;

        if self.mode == Mode::Windowed {
            self.committed += Tally::measure(&self.typed, &self.target);
            self.typed.clear();
            self.unit_index += 1;
            self.load_unit();
            debug!(line = self.unit_index, "advanced to next line");
        }

        if self.mode == Mode::Document || self.unit_index >= self.units.len() {
            self.finish();
        }

        self.emit_update();
    }

    /// Set the comparison target for the active unit
    fn load_unit(&mut self) {
        self.target = match (self.mode, self.units.get(self.unit_index)) {
            (_, None) => String::new(),
            (Mode::Document, Some(unit)) => unit.clone(),
            (Mode::Windowed, Some(line)) => {
                normalize(line, NormalizeOptions::for_strictness(self.config.strict))
            }
        };
        self.refresh();
    }

    fn refresh(&mut self) {
        self.alignment = align(&self.typed, &self.target, self.config.strict);
    }

    fn finish(&mut self) {
        self.clock.stop(self.time.now());
        self.pending_advance = false;
        self.set_phase(Phase::Completed);

        let metrics = self.metrics();
        let result = SessionResult {
            language: self.lesson.language.clone(),
            lesson_id: self.lesson.lesson_id.clone(),
            wpm: metrics.wpm,
            accuracy: metrics.accuracy,
            time_spent: self
                .elapsed()
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default(),
            completed_at: SystemTime::now(),
            mistakes: metrics.mistakes,
            symbols_missed: self.missed.clone(),
        };

        if self.emitter.emit_result(result) {
            debug!(wpm = metrics.wpm, accuracy = metrics.accuracy, "session result delivered");
        }
    }

    fn emit_update(&mut self) {
        let is_complete = self.pending_advance || self.phase == Phase::Completed;
        let metrics = self.metrics();
        self.emitter.emit_update(&self.typed, is_complete, metrics);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "session phase changed");
            self.phase = phase;
        }
    }
}

impl fmt::Debug for TypingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingSession")
            .field("mode", &self.mode)
            .field("config", &self.config)
            .field("lesson", &self.lesson)
            .field("unit_index", &self.unit_index)
            .field("units", &self.units.len())
            .field("target", &self.target)
            .field("typed", &self.typed)
            .field("phase", &self.phase)
            .field("clock", &self.clock)
            .field("pending_advance", &self.pending_advance)
            .field("emitter", &self.emitter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        clock::ManualTimeSource,
        events::{EventLog, SessionEvent},
    };

    fn type_str(session: &mut TypingSession, text: &str) {
        for char in text.chars() {
            session.insert_char(char);
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = TypingSession::document("hello");
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.target(), "hello");
        assert_eq!(session.line_count(), 1);
        assert_eq!(session.elapsed(), None);
        assert_eq!(session.alignment().verdicts(), &[Verdict::Pending; 5]);
    }

    #[test]
    fn test_document_normalizes_source() {
        let session = TypingSession::document("a\r\n\tb");
        assert_eq!(session.target(), "a\n  b");
    }

    #[test]
    fn test_first_insert_starts_clock() {
        let time = ManualTimeSource::new();
        let mut session = TypingSession::document("ab").with_time_source(time.clone());

        time.advance(Duration::from_secs(10));
        assert_eq!(session.metrics().wpm, 0);

        session.insert_char('a');
        assert_eq!(session.phase(), Phase::Active);
        time.advance(Duration::from_secs(3));
        assert_eq!(session.elapsed(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_document_completion_requires_exact_match() {
        let mut session = TypingSession::document("a\u{00A0}b");

        type_str(&mut session, "a b");
        // Forgiving display, exact completion
        assert_eq!(session.alignment().verdicts(), &[Verdict::Correct; 3]);
        assert!(!session.is_complete());

        session.backspace();
        session.backspace();
        type_str(&mut session, "\u{00A0}b");
        assert!(session.is_complete());
    }

    #[test]
    fn test_newline_is_text_in_document_mode() {
        let mut session = TypingSession::document("a\nb");
        assert_eq!(session.insert_char('a'), Some(Verdict::Correct));
        assert_eq!(session.insert_char('\n'), Some(Verdict::Correct));
        assert_eq!(session.insert_char('b'), Some(Verdict::Correct));
        assert!(session.is_complete());
    }

    #[test]
    fn test_control_characters_are_ignored() {
        let mut session = TypingSession::document("ab");
        assert_eq!(session.insert_char('\t'), None);
        assert_eq!(session.insert_char('\u{1b}'), None);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.typed(), "");
    }

    #[test]
    fn test_backspace() {
        let mut session = TypingSession::document("ab");
        assert_eq!(session.backspace(), None);

        session.insert_char('x');
        assert_eq!(session.backspace(), Some('x'));
        assert_eq!(session.typed(), "");
        // Deleting does not return to idle
        assert_eq!(session.phase(), Phase::Active);
    }

    #[test]
    fn test_backspace_stops_at_line_start() {
        let mut session = TypingSession::windowed("ab\ncd");
        type_str(&mut session, "ab");
        assert!(session.poll());

        assert_eq!(session.backspace(), None);
        assert_eq!(session.line_index(), 1);
        assert_eq!(session.typed(), "");
        assert_eq!(session.target(), "cd");

        // A pending advance is applied before deleting
        let mut session = TypingSession::windowed("ab\ncd");
        type_str(&mut session, "ab");
        assert_eq!(session.backspace(), None);
        assert_eq!(session.line_index(), 1);
        assert_eq!(session.typed(), "");
    }

    #[test]
    fn test_pause_rejects_input() {
        let time = ManualTimeSource::new();
        let mut session = TypingSession::document("abc").with_time_source(time.clone());

        assert!(!session.pause());
        session.insert_char('a');
        time.advance(Duration::from_secs(2));
        assert!(session.pause());
        assert!(session.is_paused());

        assert_eq!(session.insert_char('b'), None);
        assert_eq!(session.backspace(), None);
        assert!(!session.restart_unit());
        time.advance(Duration::from_secs(20));
        assert_eq!(session.elapsed(), Some(Duration::from_secs(2)));

        assert!(session.resume());
        assert!(!session.resume());
        assert_eq!(session.insert_char('b'), Some(Verdict::Correct));
    }

    #[test]
    fn test_completed_session_ignores_input() {
        let mut session = TypingSession::document("a");
        session.insert_char('a');
        assert!(session.is_complete());

        assert_eq!(session.insert_char('b'), None);
        assert_eq!(session.backspace(), None);
        assert!(!session.force_advance());
        assert!(!session.pause());
        assert_eq!(session.typed(), "a");
    }

    #[test]
    fn test_symbols_missed() {
        let mut session = TypingSession::document("(x)");
        type_str(&mut session, "[x]]]");
        assert_eq!(session.symbols_missed(), &BTreeSet::from(['(', ')']));
    }

    #[test]
    fn test_windowed_lines() {
        let session = TypingSession::windowed("a\nb\n");
        assert_eq!(session.line_count(), 3);
        assert_eq!(session.target(), "a");
    }

    #[test]
    fn test_windowed_deferred_advance() {
        let log = Rc::new(RefCell::new(EventLog::default()));
        let mut session = TypingSession::windowed("ab\ncd").with_observer(log.clone());

        type_str(&mut session, "ab");
        assert_eq!(log.borrow().last_typing_change(), Some(("ab", true)));
        assert_eq!(session.line_index(), 0);

        assert!(session.poll());
        assert!(!session.poll());
        assert_eq!(session.line_index(), 1);
        assert_eq!(session.target(), "cd");
        assert_eq!(log.borrow().last_typing_change(), Some(("", false)));
    }

    #[test]
    fn test_input_applies_pending_advance_first() {
        let mut session = TypingSession::windowed("ab\ncd");
        type_str(&mut session, "abc");
        assert_eq!(session.line_index(), 1);
        assert_eq!(session.typed(), "c");
    }

    #[test]
    fn test_windowed_forgiving_line() {
        let mut session = TypingSession::windowed("x  =  1  \ny");
        assert_eq!(session.target(), "x = 1");
        type_str(&mut session, "x = 1");
        assert!(session.poll());
    }

    #[test]
    fn test_windowed_strict_line() {
        let mut session = TypingSession::windowed("x  \ny").with_configuration(Configuration {
            strict: true,
            window_size: 3,
        });
        type_str(&mut session, "x ");
        assert!(!session.poll());
        session.insert_char(' ');
        assert!(session.poll());
    }

    #[test]
    fn test_force_advance_from_idle_keeps_clock_stopped() {
        let mut session = TypingSession::windowed("a\nb");
        assert!(session.force_advance());
        assert_eq!(session.line_index(), 1);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.elapsed(), None);
    }

    #[test]
    fn test_enter_forces_advance_in_windowed_mode() {
        let mut session = TypingSession::windowed("abc\ndef");
        type_str(&mut session, "ax");
        assert_eq!(session.insert_char('\n'), None);
        assert_eq!(session.line_index(), 1);
        assert_eq!(session.typed(), "");
    }

    #[test]
    fn test_restart_unit_keeps_line_and_clock() {
        let time = ManualTimeSource::new();
        let mut session = TypingSession::windowed("a\nbcd").with_time_source(time.clone());

        type_str(&mut session, "a");
        session.poll();
        type_str(&mut session, "bx");
        time.advance(Duration::from_secs(4));

        assert!(session.restart_unit());
        assert!(!session.restart_unit());
        assert_eq!(session.line_index(), 1);
        assert_eq!(session.typed(), "");
        assert_eq!(session.elapsed(), Some(Duration::from_secs(4)));
    }

    #[test]
    fn test_metrics_accumulate_across_lines() {
        let mut session = TypingSession::windowed("ab\ncd");
        type_str(&mut session, "ax");
        session.force_advance();
        type_str(&mut session, "c");

        let metrics = session.metrics();
        assert_eq!(metrics.mistakes, 1);
        assert_eq!(metrics.accuracy, 67);
    }

    #[test]
    fn test_window_projection() {
        let mut session = TypingSession::windowed("1\n2\n3\n4");
        session.force_advance();
        session.force_advance();

        let window = session.window().unwrap();
        let numbers: Vec<_> = window.iter().map(|line| line.number).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
        assert_eq!(window.active(), Some(2));

        assert!(TypingSession::document("x").window().is_none());
    }

    #[test]
    fn test_windowed_completion_delivers_result() {
        let results: Rc<RefCell<Vec<SessionResult>>> = Rc::default();
        let mut session = TypingSession::windowed("a\nb")
            .with_lesson(LessonTag::new("python", "basics"))
            .with_result_sink(results.clone());

        type_str(&mut session, "a");
        session.poll();
        type_str(&mut session, "b");
        assert!(!session.is_complete());
        assert!(results.borrow().is_empty());

        session.tick();
        assert!(session.is_complete());
        assert_eq!(session.line_index(), 2);
        assert_eq!(session.target(), "");

        let results = results.borrow();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].language, "python");
        assert_eq!(results[0].lesson_id, "basics");
        assert_eq!(results[0].accuracy, 100);
    }

    #[test]
    fn test_result_delivered_once_and_rearmed_by_reset() {
        let results: Rc<RefCell<Vec<SessionResult>>> = Rc::default();
        let mut session = TypingSession::document("ok").with_result_sink(results.clone());

        type_str(&mut session, "ok");
        session.force_advance();
        session.tick();
        assert_eq!(results.borrow().len(), 1);

        session.reset();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.typed(), "");
        type_str(&mut session, "ok");
        assert_eq!(results.borrow().len(), 2);
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut session = TypingSession::windowed("a\nb");
        type_str(&mut session, "x");
        session.force_advance();
        session.reset();

        assert_eq!(session.line_index(), 0);
        assert_eq!(session.target(), "a");
        assert!(session.symbols_missed().is_empty());
        assert_eq!(session.metrics(), MetricsSnapshot::default());
        assert_eq!(session.elapsed(), None);
    }

    #[test]
    fn test_empty_source_starts_completed() {
        let results: Rc<RefCell<Vec<SessionResult>>> = Rc::default();
        let mut session = TypingSession::windowed("").with_result_sink(results.clone());

        assert!(session.is_complete());
        assert_eq!(session.insert_char('a'), None);
        session.reset();
        assert!(session.is_complete());
        assert!(results.borrow().is_empty());
    }

    #[test]
    fn test_every_mutation_emits_both_payloads() {
        let log = Rc::new(RefCell::new(EventLog::default()));
        let mut session = TypingSession::document("ab").with_observer(log.clone());

        session.insert_char('a');
        session.backspace();
        session.insert_char('\u{7}');

        let log = log.borrow();
        assert_eq!(log.events().len(), 4);
        assert!(matches!(
            log.events()[0],
            SessionEvent::TypingChange { ref text, is_complete: false } if text == "a"
        ));
        assert!(matches!(log.events()[3], SessionEvent::StatsUpdate(_)));
    }
}
