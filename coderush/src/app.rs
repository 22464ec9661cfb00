use std::time::Duration;

use crossterm::event::{self, Event};
use ratatui::{Frame, style::Stylize, text::ToLine, widgets::Padding};
use rushline::SessionResult;
use tracing::debug;

use crate::practice::Practice;
use crate::utils::ROUNDED_BLOCK;

/// How long to wait for input before redrawing the clock
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A message from the practice page to the app
#[derive(Debug)]
pub enum Message {
    Finished,
    Quit,
}

/// How a practice run ended
#[derive(Debug)]
pub enum Outcome {
    Completed(SessionResult),
    Abandoned,
}

/// The app itself
pub struct App {
    page: Practice,
}

impl App {
    /// Creates a new `App`
    pub const fn new(page: Practice) -> Self {
        Self { page }
    }

    /// Runs the app until the session completes or the user quits
    ///
    /// The terminal is restored before returning, also on error.
    pub fn run(mut self) -> std::io::Result<Outcome> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal);
        ratatui::restore();

        let message = result?;
        debug!(?message, "practice page closed");

        Ok(match self.page.take_result() {
            Some(result) => Outcome::Completed(result),
            None => Outcome::Abandoned,
        })
    }

    fn event_loop(&mut self, terminal: &mut ratatui::DefaultTerminal) -> std::io::Result<Message> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if let Some(message) = self.page.poll() {
                return Ok(message);
            }

            let event = event::poll(POLL_INTERVAL)?
                .then(event::read)
                .transpose()?;

            if let Some(message) = event.and_then(|event| self.handle_event(&event)) {
                return Ok(message);
            }
        }
    }

    /// Draws the next frame
    fn draw(&self, frame: &mut Frame) {
        let block = ROUNDED_BLOCK
            .padding(Padding::new(1, 1, 0, 0))
            .title_top("CODERUSH".to_line().bold().centered())
            .title_top("<CTRL-Q> to exit".to_line().right_aligned())
            .title_top(self.page.render_top());

        let area = frame.area();
        let content = block.inner(area);

        frame.render_widget(block, area);
        self.page.render(frame, content);
    }

    fn handle_event(&mut self, event: &Event) -> Option<Message> {
        self.page.handle_events(event)
    }
}
