use anyhow::Result;
use ratatui::DefaultTerminal;

use super::event::{self, AppEvent};
use super::theme::Theme;
use super::ui;
use super::window::{Status, Window};

pub struct App {
    pub window: Window,
    pub theme: Theme,
}

impl App {
    pub fn new(window: Window, theme: Theme) -> Self {
        App { window, theme }
    }

    /// Draw, wait for input, dispatch; repeat until the window asks to exit.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|frame| ui::draw(frame, &self.window, &self.theme))?;

            match event::next()? {
                AppEvent::Key(key) => {
                    if self.window.dispatch(key) == Status::Exit {
                        tracing::info!("session ended");
                        return Ok(());
                    }
                }
                // The next draw picks up the new size.
                AppEvent::Resize | AppEvent::Other => {}
            }
        }
    }
}
