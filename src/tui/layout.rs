//! The stock search screen.

use super::panel::Panel;

/// Column where every left-hand input starts.
const FIELD_X: u16 = 12;
/// Column of the month label next to a year field.
const MONTH_LABEL_X: u16 = 18;
const MONTH_FIELD_X: u16 = 25;

const TEXT_WIDTH: u16 = 100;
const RULE: &str =
    "--------------------------------------------------------------------------------";

/// Header, the six search inputs and a rule above the result area.
pub fn default_panels() -> Vec<Panel> {
    vec![
        Panel::label(
            0,
            0,
            "Input search forms, then press <Enter> to get links from ADS.",
        ),
        Panel::label(0, 1, "Press <TAB>/<Ctrl-N> or <Ctrl-P> to move between forms."),
        Panel::label(0, 2, RULE),
        Panel::label(0, 3, "   Authors:"),
        Panel::field(FIELD_X, 3, TEXT_WIDTH, "author"),
        Panel::label(0, 4, "start year:"),
        Panel::field(FIELD_X, 4, 4, "start_year"),
        Panel::label(MONTH_LABEL_X, 4, "month:"),
        Panel::field(MONTH_FIELD_X, 4, 2, "start_mon"),
        Panel::label(0, 5, "  end year:"),
        Panel::field(FIELD_X, 5, 4, "end_year"),
        Panel::label(MONTH_LABEL_X, 5, "month:"),
        Panel::field(MONTH_FIELD_X, 5, 2, "end_mon"),
        Panel::label(0, 6, "     Title:"),
        Panel::field(FIELD_X, 6, TEXT_WIDTH, "title"),
        Panel::label(0, 7, "  Abstract:"),
        Panel::field(FIELD_X, 7, TEXT_WIDTH, "text"),
        Panel::label(0, 8, RULE),
    ]
}
