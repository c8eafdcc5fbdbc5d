use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Other,
}

/// Block until the terminal delivers the next event.
///
/// Key releases are reported as [`AppEvent::Other`] so a press is handled once
/// on terminals that report both edges.
pub fn next() -> Result<AppEvent> {
    Ok(classify(event::read()?))
}

fn classify(ev: Event) -> AppEvent {
    match ev {
        Event::Key(key) if key.kind != KeyEventKind::Release => AppEvent::Key(key),
        Event::Resize(..) => AppEvent::Resize,
        _ => AppEvent::Other,
    }
}
