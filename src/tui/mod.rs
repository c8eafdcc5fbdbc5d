pub mod app;
pub mod cursor;
pub mod error;
pub mod event;
pub mod keymap;
pub mod layout;
pub mod panel;
pub mod theme;
pub mod ui;
pub mod window;

use anyhow::Result;

use crate::ads::AdsClient;
use crate::config::Config;

use self::window::{Window, WindowOptions};

/// Run the interactive search form until the user quits.
pub fn run(config: &Config) -> Result<()> {
    let client = AdsClient::new(&config.search)?;
    let options = WindowOptions {
        max_results: config.display.max_results,
        results_row: config.display.results_row,
        exit_on_query_error: config.exit_on_query_error,
    };
    let mut window = Window::new(layout::default_panels(), Box::new(client), options);
    window.acquire_focus()?;

    let mut app = app::App::new(window, config.theme.build());
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
