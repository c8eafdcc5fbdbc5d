use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use super::window::{DrawRole, NoticeStyle};

/// Colours used by the form renderer.
///
/// Each one can be overridden via `[theme]` in `config.toml`.
#[derive(Debug, Clone)]
pub struct Theme {
    pub label: Color,
    pub field: Color,
    pub field_focused: Color,
    pub result: Color,

    pub notice_info: Color,
    pub notice_error: Color,

    // ── Hint bar ──────────────────────────────────────────────
    pub hint_key: Color,
    pub hint_desc: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            label: Color::Cyan,
            field: Color::White,
            field_focused: Color::Yellow,
            result: Color::White,

            notice_info: Color::Green,
            notice_error: Color::Red,

            hint_key: Color::Cyan,
            hint_desc: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Style for one painted piece of the screen.
    pub fn style_for(&self, role: DrawRole) -> Style {
        match role {
            DrawRole::Label => Style::default().fg(self.label),
            DrawRole::Field { focused: false } => Style::default()
                .fg(self.field)
                .add_modifier(Modifier::UNDERLINED),
            DrawRole::Field { focused: true } => Style::default()
                .fg(self.field_focused)
                .add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
            DrawRole::Result => Style::default().fg(self.result),
            DrawRole::Notice(style) => self.notice_style(style),
        }
    }

    pub fn notice_style(&self, style: NoticeStyle) -> Style {
        let color = match style {
            NoticeStyle::Info => self.notice_info,
            NoticeStyle::Error => self.notice_error,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn hint_key_style(&self) -> Style {
        Style::default()
            .fg(self.hint_key)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hint_desc_style(&self) -> Style {
        Style::default().fg(self.hint_desc)
    }
}

// ── Config deserialization ────────────────────────────────────────────

/// All-optional mirror of [`Theme`] for the `[theme]` section of `config.toml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeConfig {
    pub label: Option<String>,
    pub field: Option<String>,
    pub field_focused: Option<String>,
    pub result: Option<String>,
    pub notice_info: Option<String>,
    pub notice_error: Option<String>,
    pub hint_key: Option<String>,
    pub hint_desc: Option<String>,
}

/// Parse a colour string into a ratatui `Color`.
///
/// Supports named colours (`"cyan"`, `"dark_gray"`, ...), `"#rrggbb"` and
/// `"rgb(R,G,B)"`.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let parts: Vec<u8> = inner
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .ok()?;
        return match parts[..] {
            [r, g, b] => Some(Color::Rgb(r, g, b)),
            _ => None,
        };
    }
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }

    let lower = s.to_lowercase().replace('-', "_");
    match lower.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "light_red" | "lightred" => Some(Color::LightRed),
        "light_green" | "lightgreen" => Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => Some(Color::LightYellow),
        "light_blue" | "lightblue" => Some(Color::LightBlue),
        "light_cyan" | "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

fn apply(target: &mut Color, source: Option<&String>) {
    let Some(s) = source else {
        return;
    };
    match parse_color(s) {
        Some(color) => *target = color,
        None => tracing::warn!("ignoring unknown theme colour '{s}'"),
    }
}

impl ThemeConfig {
    /// Default theme with every configured colour applied on top.
    pub fn build(&self) -> Theme {
        let mut t = Theme::default();

        apply(&mut t.label, self.label.as_ref());
        apply(&mut t.field, self.field.as_ref());
        apply(&mut t.field_focused, self.field_focused.as_ref());
        apply(&mut t.result, self.result.as_ref());
        apply(&mut t.notice_info, self.notice_info.as_ref());
        apply(&mut t.notice_error, self.notice_error.as_ref());
        apply(&mut t.hint_key, self.hint_key.as_ref());
        apply(&mut t.hint_desc, self.hint_desc.as_ref());

        t
    }
}
