use std::{cell::RefCell, rc::Rc};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};
use rushline::{
    Decoration, SessionResult, SessionResultSink, TypingSession, Verdict, WindowLine,
};
use tracing::info;

use crate::{
    app::Message,
    statistics::StatisticsManager,
    utils::{KeyEventHelper, format_clock},
};

/// What a key press asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    Backspace,
    RestartUnit,
    TogglePause,
    Reset,
    Quit,
}

impl Action {
    /// Map a key press to an action. Releases and unbound keys map to nothing.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if !key.is_press() {
            return None;
        }
        if key.is_ctrl_press_char('q') {
            return Some(Self::Quit);
        }
        if key.is_ctrl_press_char('r') {
            return Some(Self::Reset);
        }

        match key.code {
            // AltGr arrives as CONTROL | ALT on some platforms
            KeyCode::Char(_)
                if key.has_mods(KeyModifiers::CONTROL) && !key.has_mods(KeyModifiers::ALT) =>
            {
                None
            }
            KeyCode::Char(char) => Some(Self::Insert(char)),
            KeyCode::Enter => Some(Self::Insert('\n')),
            KeyCode::Backspace => Some(Self::Backspace),
            KeyCode::Tab => Some(Self::RestartUnit),
            KeyCode::Esc => Some(Self::TogglePause),
            _ => None,
        }
    }
}

/// Receives the session result: stores it when saving is enabled and keeps it for the summary
#[derive(Debug, Default)]
pub struct SessionRecorder {
    store: Option<StatisticsManager>,
    last: Option<SessionResult>,
}

impl SessionRecorder {
    pub const fn new(store: Option<StatisticsManager>) -> Self {
        Self { store, last: None }
    }

    pub fn take_result(&mut self) -> Option<SessionResult> {
        self.last.take()
    }
}

impl SessionResultSink for SessionRecorder {
    fn store(&mut self, result: SessionResult) {
        info!(
            language = %result.language,
            lesson = %result.lesson_id,
            wpm = result.wpm,
            accuracy = result.accuracy,
            "session completed"
        );

        if let Some(store) = self.store.as_mut() {
            store.store(result.clone());
        }
        self.last = Some(result);
    }
}

/// Page: Practice
///
/// Hosts one typing session
#[derive(Debug)]
pub struct Practice {
    session: TypingSession,
    recorder: Rc<RefCell<SessionRecorder>>,
    title: String,
}

impl Practice {
    pub fn new(session: TypingSession, recorder: SessionRecorder) -> Self {
        let recorder = Rc::new(RefCell::new(recorder));
        let lesson = session.lesson();
        let title = format!("{}/{}", lesson.language, lesson.lesson_id);

        Self {
            session: session.with_result_sink(recorder.clone()),
            recorder,
            title,
        }
    }

    pub fn session(&self) -> &TypingSession {
        &self.session
    }

    /// The result of the completed session, if there is one
    pub fn take_result(&self) -> Option<SessionResult> {
        self.recorder.borrow_mut().take_result()
    }

    /// Apply one action to the session
    ///
    /// Returns a message if the page is done.
    pub fn apply(&mut self, action: Action) -> Option<Message> {
        // Input is withheld while paused
        if self.session.is_paused()
            && !matches!(action, Action::TogglePause | Action::Reset | Action::Quit)
        {
            return None;
        }

        match action {
            Action::Insert(char) => {
                self.session.insert_char(char);
            }
            Action::Backspace => {
                self.session.backspace();
            }
            Action::RestartUnit => {
                self.session.restart_unit();
            }
            Action::TogglePause => {
                if !self.session.pause() {
                    self.session.resume();
                }
            }
            Action::Reset => self.session.reset(),
            Action::Quit => return Some(Message::Quit),
        }

        self.finished()
    }

    pub fn handle_events(&mut self, event: &Event) -> Option<Message> {
        match event {
            Event::Key(key) => Action::from_key(key).and_then(|action| self.apply(action)),
            _ => None,
        }
    }

    /// Called on every loop iteration, with or without input
    pub fn poll(&mut self) -> Option<Message> {
        self.session.tick();
        self.finished()
    }

    fn finished(&self) -> Option<Message> {
        self.session.is_complete().then_some(Message::Finished)
    }
}

// Rendering logic
impl Practice {
    pub fn render_top(&self) -> Line<'_> {
        let metrics = self.session.metrics();
        let seconds = self
            .session
            .elapsed()
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();

        let mut status = format!(
            "{} | {} | WPM: {} | ACC: {}% | ERR: {}",
            self.title,
            format_clock(seconds),
            metrics.wpm,
            metrics.accuracy,
            metrics.mistakes
        );
        if self.session.is_paused() {
            status.push_str(" | PAUSED");
        }

        Line::raw(status)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let [body, help] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let lines = match self.session.window() {
            Some(window) => window
                .iter()
                .map(|line| self.window_line(line))
                .collect(),
            None => decorated_lines(self.session.decorations()),
        };

        frame.render_widget(Paragraph::new(lines), body);
        frame.render_widget(
            Line::from("<TAB> restart line | <ESC> pause | <CTRL-R> reset").dark_gray(),
            help,
        );
    }

    fn window_line(&self, line: WindowLine<'_>) -> Line<'static> {
        let number = Span::raw(format!("{:>4} ", line.number)).dark_gray();

        if !line.is_active {
            return Line::from(vec![number, Span::raw(line.text.to_string()).dark_gray()]);
        }

        let mut spans = vec![number.bold()];
        if let Some(active) = decorated_lines(self.session.decorations()).into_iter().next() {
            spans.extend(active.spans);
        }
        Line::from(spans)
    }
}

/// Turn decorations into styled lines, breaking at newlines
///
/// A cursor past the last decoration is drawn as a highlighted space.
pub fn decorated_lines<'a>(decorations: impl ExactSizeIterator<Item = Decoration>) -> Vec<Line<'a>> {
    let len = decorations.len();
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'a>> = Vec::new();
    let mut cursor_drawn = false;

    for decoration in decorations {
        cursor_drawn |= decoration.has_cursor;
        let style = decoration_style(&decoration);

        if decoration.char == '\n' {
            // Keep the newline visible while it is the next or a wrong character
            if decoration.has_cursor || decoration.verdict == Verdict::Incorrect {
                spans.push(Span::styled(" ", style));
            }
            lines.push(Line::from(std::mem::take(&mut spans)));
            continue;
        }

        spans.push(Span::styled(decoration.char.to_string(), style));
    }

    if !cursor_drawn {
        spans.push(Span::styled(" ", cursor_style()));
    }
    if !spans.is_empty() || len == 0 {
        lines.push(Line::from(spans));
    }

    lines
}

fn decoration_style(decoration: &Decoration) -> Style {
    let style = match decoration.verdict {
        Verdict::Pending => Style::new().fg(Color::Gray),
        Verdict::Correct => Style::new().fg(Color::Green),
        Verdict::Incorrect if decoration.char == ' ' || decoration.is_overflow => {
            Style::new().bg(Color::Red)
        }
        Verdict::Incorrect => Style::new().fg(Color::Red).add_modifier(Modifier::BOLD),
    };

    if decoration.has_cursor {
        return style.patch(cursor_style());
    }
    style
}

fn cursor_style() -> Style {
    Style::new().add_modifier(Modifier::REVERSED)
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventKind;
    use rushline::{LessonTag, Phase};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn practice(source: &str) -> Practice {
        let session = TypingSession::document(source).with_lesson(LessonTag::new("rust", "demo"));
        Practice::new(session, SessionRecorder::default())
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('a'))),
            Some(Action::Insert('a'))
        );
        assert_eq!(
            Action::from_key(&key(KeyCode::Enter)),
            Some(Action::Insert('\n'))
        );
        assert_eq!(Action::from_key(&key(KeyCode::Tab)), Some(Action::RestartUnit));
        assert_eq!(Action::from_key(&key(KeyCode::Esc)), Some(Action::TogglePause));
        assert_eq!(
            Action::from_key(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Reset)
        );
        assert_eq!(
            Action::from_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(
            Action::from_key(&KeyEvent::new_with_kind(
                KeyCode::Char('a'),
                KeyModifiers::NONE,
                KeyEventKind::Release
            )),
            None
        );
    }

    #[test]
    fn test_shifted_characters_are_inserted() {
        assert_eq!(
            Action::from_key(&KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Action::Insert('A'))
        );
    }

    #[test]
    fn test_altgr_characters_are_inserted() {
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        for char in ['{', '}', '[', ']', '\\', '|', '@', '~'] {
            assert_eq!(
                Action::from_key(&KeyEvent::new(KeyCode::Char(char), altgr)),
                Some(Action::Insert(char))
            );
        }
    }

    #[test]
    fn test_pause_withholds_input() {
        let mut practice = practice("ab");
        practice.apply(Action::Insert('a'));
        practice.apply(Action::TogglePause);
        assert!(practice.session().is_paused());

        practice.apply(Action::Insert('b'));
        assert_eq!(practice.session().typed(), "a");

        practice.apply(Action::TogglePause);
        assert_eq!(practice.session().phase(), Phase::Active);
    }

    #[test]
    fn test_completion_is_recorded() {
        let mut practice = practice("ok");
        assert!(practice.apply(Action::Insert('o')).is_none());
        assert!(matches!(
            practice.apply(Action::Insert('k')),
            Some(Message::Finished)
        ));

        let result = practice.take_result().unwrap();
        assert_eq!(result.lesson_id, "demo");
        assert!(practice.take_result().is_none());
    }

    #[test]
    fn test_quit() {
        let mut practice = practice("ok");
        assert!(matches!(practice.apply(Action::Quit), Some(Message::Quit)));
        assert!(practice.take_result().is_none());
    }

    #[test]
    fn test_recorder_saves_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatisticsManager::new(dir.path().to_path_buf()).unwrap();
        let session = TypingSession::document("x").with_lesson(LessonTag::new("go", "x"));
        let mut practice = Practice::new(session, SessionRecorder::new(Some(store)));

        practice.apply(Action::Insert('x'));

        let saved = StatisticsManager::new(dir.path().to_path_buf())
            .unwrap()
            .load_all()
            .unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].language, "go");
    }

    #[test]
    fn test_decorated_lines_break_at_newlines() {
        let mut session = TypingSession::document("ab\ncd");
        session.insert_char('a');

        let lines = decorated_lines(session.decorations());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 2);
        assert_eq!(lines[1].spans.len(), 2);
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_cursor_at_end_is_drawn() {
        let mut session = TypingSession::document("ab");
        session.insert_char('a');
        session.insert_char('x');
        session.insert_char('y');

        let lines = decorated_lines(session.decorations());
        assert_eq!(lines.len(), 1);
        // a, x, overflow y, cursor
        assert_eq!(lines[0].spans.len(), 4);
    }
}
