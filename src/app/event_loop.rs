use std::io::{Write, stdout};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;

use crate::app::{App, Session, dispatch, key_token};
use crate::editor::LineStore;

/// Rows below the buffer window: mode line and message line.
pub(crate) const STATUS_ROWS: u16 = 2;

/// Buffer window height for a terminal with `rows` rows.
pub(crate) const fn window_height(rows: u16) -> u16 {
    let height = rows.saturating_sub(STATUS_ROWS);
    if height == 0 { 1 } else { height }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read, terminal initialization
    /// fails, or reading terminal events fails.
    pub fn run(&mut self) -> Result<()> {
        let store = LineStore::load(&self.file_path)
            .with_context(|| format!("Failed to open {}", self.file_path.display()))?;

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: lined requires an interactive terminal")?;
        let size = terminal.size()?;
        tracing::debug!(
            path = %self.file_path.display(),
            width = size.width,
            height = size.height,
            "starting session"
        );

        let mut session = Session::new(store, size.width, window_height(size.height))
            .with_tab_width(self.tab_width)
            .with_bell(self.bell_enabled);

        let result = Self::event_loop(&mut terminal, &mut session);

        ratatui::restore();
        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, session: &mut Session) -> Result<()> {
        let mut needs_render = true;
        loop {
            if needs_render {
                session.refresh_screen();
                needs_render = false;
            }
            terminal.draw(|frame| crate::ui::render(session, frame))?;
            if session.take_bell() {
                let mut out = stdout();
                out.write_all(b"\x07")?;
                out.flush()?;
            }
            if session.should_quit {
                tracing::debug!("quit");
                return Ok(());
            }

            match event::read()? {
                Event::Key(key) => {
                    if let Some(token) = key_token(key) {
                        needs_render = dispatch(session, token);
                    }
                }
                Event::Resize(width, height) => {
                    session.resize(width, window_height(height));
                }
                _ => {}
            }
        }
    }
}
