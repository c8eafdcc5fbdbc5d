use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme::Theme;
use super::window::{DrawOp, DrawRole, Window};

pub fn draw(frame: &mut Frame, window: &Window, theme: &Theme) {
    let area = frame.area();
    if area.height == 0 {
        return;
    }
    let body = Rect {
        height: area.height - 1,
        ..area
    };

    for op in window.render() {
        let Some(rect) = op_rect(&op, body) else {
            continue;
        };
        let text = match op.role {
            // Pad so the whole input area shows its style, not just the typed text.
            DrawRole::Field { .. } => format!("{:<width$}", op.text, width = usize::from(op.width)),
            _ => op.text,
        };
        frame.render_widget(
            Paragraph::new(text).style(theme.style_for(op.role)),
            rect,
        );
    }

    if let Some(pos) = window.cursor_position()
        && pos.x < body.right()
        && pos.y < body.bottom()
    {
        frame.set_cursor_position((pos.x, pos.y));
    }

    let hint_row = Rect::new(area.x, area.bottom() - 1, area.width, 1);
    draw_hints(frame, hint_row, window, theme);
}

/// Screen cells covered by `op`, clipped to `area`; `None` when nothing is visible.
fn op_rect(op: &DrawOp, area: Rect) -> Option<Rect> {
    let rect = Rect::new(op.at.x, op.at.y, op.width, 1).intersection(area);
    (rect.width > 0 && rect.height > 0).then_some(rect)
}

fn draw_hints(frame: &mut Frame, area: Rect, window: &Window, theme: &Theme) {
    let key_style = theme.hint_key_style();
    let desc_style = theme.hint_desc_style();
    let spans: Vec<Span<'_>> = window
        .keymap()
        .help_entries()
        .into_iter()
        .flat_map(|(_, entries)| entries)
        .flat_map(|entry| {
            [
                Span::styled(entry.label, key_style),
                Span::styled(format!(" {}  ", entry.description), desc_style),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
