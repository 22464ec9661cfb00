//! # Events Module - The Engine's Integration Surface
//!
//! A session talks to the outside world through two traits:
//!
//! - [`SessionObserver`] receives the typed text with a completion flag, and a
//!   [`MetricsSnapshot`], synchronously after every change to the typed text.
//! - [`SessionResultSink`] receives one [`SessionResult`] when a session completes. The sink
//!   decides how, and whether, the record is stored.
//!
//! ## Usage
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rushline::{EventLog, SessionEvent, SessionResult, TypingSession};
//!
//! let log = Rc::new(RefCell::new(EventLog::default()));
//! let results: Rc<RefCell<Vec<SessionResult>>> = Rc::default();
//!
//! let mut session = TypingSession::document("ok")
//!     .with_observer(log.clone())
//!     .with_result_sink(results.clone());
//!
//! session.insert_char('o');
//! session.insert_char('k');
//!
//! assert!(matches!(
//!     log.borrow().events().last(),
//!     Some(SessionEvent::StatsUpdate(_))
//! ));
//! assert_eq!(results.borrow().len(), 1);
//! ```

use std::{cell::RefCell, collections::BTreeSet, fmt, rc::Rc};

use serde::{Deserialize, Serialize};
use web_time::SystemTime;

use crate::math::MetricsSnapshot;

/// Receives live updates from a session
///
/// Both methods default to doing nothing, so observers only implement what they need.
pub trait SessionObserver {
    /// Called after every change to the typed text
    fn on_typing_change(&mut self, _text: &str, _is_complete: bool) {}

    /// Called after every change to the typed text, right after [`on_typing_change`](Self::on_typing_change)
    fn on_stats_update(&mut self, _metrics: MetricsSnapshot) {}
}

/// Receives the record of a completed session
///
/// Called at most once per attempt. Ownership of the record passes to the sink.
pub trait SessionResultSink {
    fn store(&mut self, result: SessionResult);
}

/// Record of a completed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Language tag of the practiced snippet
    pub language: String,
    /// Identifier of the practiced lesson
    pub lesson_id: String,
    /// Final words per minute
    pub wpm: u32,
    /// Final accuracy percentage
    pub accuracy: u32,
    /// Active typing time in whole seconds
    pub time_spent: u64,
    /// Wall-clock time of completion
    pub completed_at: SystemTime,
    /// Characters typed incorrectly over the whole session
    pub mistakes: usize,
    /// Target characters that were mistyped at least once
    pub symbols_missed: BTreeSet<char>,
}

impl<T: SessionObserver + ?Sized> SessionObserver for Rc<RefCell<T>> {
    fn on_typing_change(&mut self, text: &str, is_complete: bool) {
        self.borrow_mut().on_typing_change(text, is_complete);
    }

    fn on_stats_update(&mut self, metrics: MetricsSnapshot) {
        self.borrow_mut().on_stats_update(metrics);
    }
}

impl<T: SessionResultSink + ?Sized> SessionResultSink for Rc<RefCell<T>> {
    fn store(&mut self, result: SessionResult) {
        self.borrow_mut().store(result);
    }
}

impl SessionResultSink for Vec<SessionResult> {
    fn store(&mut self, result: SessionResult) {
        self.push(result);
    }
}

/// A single recorded observer callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TypingChange { text: String, is_complete: bool },
    StatsUpdate(MetricsSnapshot),
}

/// An observer that records every callback in order
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<SessionEvent>,
}

impl EventLog {
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// The most recent typing change, if any
    pub fn last_typing_change(&self) -> Option<(&str, bool)> {
        self.events.iter().rev().find_map(|event| match event {
            SessionEvent::TypingChange { text, is_complete } => Some((text.as_str(), *is_complete)),
            SessionEvent::StatsUpdate(_) => None,
        })
    }

    /// The most recent metrics, if any
    pub fn last_stats(&self) -> Option<MetricsSnapshot> {
        self.events.iter().rev().find_map(|event| match event {
            SessionEvent::StatsUpdate(metrics) => Some(*metrics),
            SessionEvent::TypingChange { .. } => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SessionObserver for EventLog {
    fn on_typing_change(&mut self, text: &str, is_complete: bool) {
        self.events.push(SessionEvent::TypingChange {
            text: text.to_string(),
            is_complete,
        });
    }

    fn on_stats_update(&mut self, metrics: MetricsSnapshot) {
        self.events.push(SessionEvent::StatsUpdate(metrics));
    }
}

/// Fans session events out to the registered collaborators
#[derive(Default)]
pub(crate) struct Emitter {
    observers: Vec<Box<dyn SessionObserver>>,
    sink: Option<Box<dyn SessionResultSink>>,
    result_delivered: bool,
}

impl Emitter {
    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn set_sink(&mut self, sink: Box<dyn SessionResultSink>) {
        self.sink = Some(sink);
    }

    /// Deliver one typed-text change and the metrics that go with it
    pub fn emit_update(&mut self, text: &str, is_complete: bool, metrics: MetricsSnapshot) {
        for observer in &mut self.observers {
            observer.on_typing_change(text, is_complete);
            observer.on_stats_update(metrics);
        }
    }

    /// Deliver the session result unless one was already delivered for this attempt
    ///
    /// Returns true if the result was handed to a sink.
    pub fn emit_result(&mut self, result: SessionResult) -> bool {
        if self.result_delivered {
            return false;
        }
        self.result_delivered = true;

        match self.sink.as_mut() {
            Some(sink) => {
                sink.store(result);
                true
            }
            None => false,
        }
    }

    /// Allow the next attempt to deliver its own result
    pub const fn rearm(&mut self) {
        self.result_delivered = false;
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("observers", &self.observers.len())
            .field("has_sink", &self.sink.is_some())
            .field("result_delivered", &self.result_delivered)
            .finish()
    }
}
