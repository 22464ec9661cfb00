//! # Clock Module - Lazy, Pausable Session Timing
//!
//! The session clock only measures time spent typing. It starts on the first keystroke, stops
//! accumulating while paused, and freezes when the session completes.
//!
//! Time is read through a [`TimeSource`], so hosts and tests can substitute their own notion of
//! "now". [`SystemTimeSource`] reads the platform monotonic clock; [`ManualTimeSource`] only
//! moves when told to.

use std::{cell::Cell, rc::Rc};

use web_time::{Duration, Instant};

/// Provides the current instant
pub trait TimeSource {
    fn now(&self) -> Instant;
}

/// Reads the monotonic system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A time source that only advances when asked to
///
/// Clones share the same time, so a test can keep one handle and give another to a session.
///
/// ```rust
/// use rushline::clock::{ManualTimeSource, TimeSource};
/// use web_time::Duration;
///
/// let time = ManualTimeSource::new();
/// let handle = time.clone();
/// let before = time.now();
///
/// handle.advance(Duration::from_secs(2));
/// assert_eq!(time.now() - before, Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct ManualTimeSource {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::default(),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Default for ManualTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Handles timing for a session
#[derive(Debug, Default, Clone)]
pub struct SessionClock {
    /// Set on the first keystroke
    started_at: Option<Instant>,
    /// Time accumulated by finished running segments
    accumulated: Duration,
    /// Start of the currently running segment. `None` while paused or stopped.
    running_since: Option<Instant>,
    paused: bool,
    stopped: bool,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing. Does nothing if the clock was already started.
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_some() {
            return;
        }

        self.started_at = Some(now);
        if !self.paused {
            self.running_since = Some(now);
        }
    }

    /// Check if timing has started
    pub const fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Stop accumulating time until [`resume`](Self::resume) is called
    pub fn pause(&mut self, now: Instant) {
        if self.paused || self.stopped {
            return;
        }

        self.close_segment(now);
        self.paused = true;
    }

    /// Continue accumulating time after a pause
    pub fn resume(&mut self, now: Instant) {
        if !self.paused || self.stopped {
            return;
        }

        self.paused = false;
        if self.started_at.is_some() {
            self.running_since = Some(now);
        }
    }

    /// Freeze the clock for good
    pub fn stop(&mut self, now: Instant) {
        if self.stopped {
            return;
        }

        self.close_segment(now);
        self.stopped = true;
    }

    /// Get the active time since the first keystroke
    ///
    /// Returns `None` until the clock has started.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.started_at?;

        let running = self
            .running_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or_default();

        Some(self.accumulated + running)
    }

    /// Return to the unstarted state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn close_segment(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }
}
