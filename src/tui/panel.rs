//! Fixed-position text regions: read-only labels and editable fields.
//!
//! All text offsets are counted in chars. A field's cursor always lies within
//! `origin.x ..= origin.x + len(text)`; every mutating operation re-checks that
//! before slicing the text.

use super::cursor::{Cursor, Position};
use super::error::EngineError;

/// Static text drawn at a fixed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    origin: Position,
    text: String,
}

impl Label {
    pub fn new(x: u16, y: u16, text: impl Into<String>) -> Self {
        Label {
            origin: Position::new(x, y),
            text: text.into(),
        }
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> u16 {
        self.text.chars().count() as u16
    }
}

/// A single-line editable input bound to a form parameter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    origin: Position,
    width: u16,
    text: String,
    cursor: Cursor,
    name: String,
    allow_overflow: bool,
}

impl Field {
    pub fn new(x: u16, y: u16, width: u16, name: impl Into<String>) -> Self {
        Field {
            origin: Position::new(x, y),
            width,
            text: String::new(),
            cursor: Cursor::new(x, y),
            name: name.into(),
            allow_overflow: false,
        }
    }

    /// Let the text grow past `width`. Only the first `width` chars are drawn.
    #[must_use]
    pub fn allow_overflow(mut self) -> Self {
        self.allow_overflow = true;
        self
    }

    /// Pre-fill the field. The text is cut to `width` unless overflow was allowed
    /// first, and never runs past the last screen column; the cursor stays on the
    /// first column.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        let limit = if self.allow_overflow {
            self.columns_left()
        } else {
            usize::from(self.width)
        };
        self.text = text.chars().take(limit).collect();
        self.cursor.move_to(self.origin.x, self.origin.y);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn cursor(&self) -> Position {
        self.cursor.position()
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_full(&self) -> bool {
        !self.allow_overflow && self.len() >= usize::from(self.width)
    }

    /// Column just past the last char, or `None` if that lies off the screen.
    fn last_x(&self) -> Option<u16> {
        u16::try_from(self.len())
            .ok()
            .and_then(|len| self.origin.x.checked_add(len))
    }

    /// Chars that still fit between the origin and the last screen column.
    fn columns_left(&self) -> usize {
        usize::from(u16::MAX - self.origin.x)
    }

    fn out_of_range(&self) -> EngineError {
        EngineError::OutOfRange {
            cursor: self.cursor.x,
            first: self.origin.x,
            last: self.last_x().unwrap_or(u16::MAX),
        }
    }

    /// Cursor offset into the text. Only meaningful after `check_cursor`.
    fn offset(&self) -> usize {
        usize::from(self.cursor.x - self.origin.x)
    }

    fn byte_index(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map_or(self.text.len(), |(i, _)| i)
    }

    /// The text as drawn: at most `width` chars.
    pub fn visible_text(&self) -> &str {
        &self.text[..self.byte_index(usize::from(self.width))]
    }

    /// Where the terminal cursor is drawn; never right of the field's box.
    pub fn cursor_screen_position(&self) -> Position {
        let right = self.origin.x.saturating_add(self.width);
        Position::new(self.cursor.x.min(right), self.cursor.y)
    }

    pub fn check_cursor(&self) -> Result<(), EngineError> {
        match self.last_x() {
            Some(last) if (self.origin.x..=last).contains(&self.cursor.x) => Ok(()),
            _ => Err(self.out_of_range()),
        }
    }

    /// Insert `s` at the cursor and move the cursor past it.
    ///
    /// A full field silently ignores the input; a partial fit keeps only the
    /// leading chars that fit. An overflowing field fails with `OutOfRange` once
    /// the text would run past the last screen column.
    pub fn insert(&mut self, s: &str) -> Result<(), EngineError> {
        self.check_cursor()?;
        let room = if self.allow_overflow {
            usize::MAX
        } else {
            usize::from(self.width).saturating_sub(self.len())
        };
        let inserted: String = s.chars().take(room).collect();
        let count = inserted.chars().count();
        if count == 0 {
            return Ok(());
        }
        if self.len() + count > self.columns_left() {
            return Err(self.out_of_range());
        }
        let Some(new_x) = u16::try_from(count)
            .ok()
            .and_then(|n| self.cursor.x.checked_add(n))
        else {
            return Err(self.out_of_range());
        };

        let at = self.byte_index(self.offset());
        self.text.insert_str(at, &inserted);
        self.cursor.move_to(new_x, self.cursor.y);
        Ok(())
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) -> Result<(), EngineError> {
        if self.text.is_empty() {
            return Ok(());
        }
        self.check_cursor()?;
        let offset = self.offset();
        if offset == 0 {
            return Ok(());
        }
        let at = self.byte_index(offset - 1);
        self.text.remove(at);
        self.cursor.step_left();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.move_cursor_first();
    }

    pub fn move_cursor_first(&mut self) {
        self.cursor.move_to(self.origin.x, self.origin.y);
    }

    pub fn move_cursor_last(&mut self) {
        if let Some(last) = self.last_x() {
            self.cursor.move_to(last, self.origin.y);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor.x > self.origin.x {
            self.cursor.step_left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.last_x().is_some_and(|last| self.cursor.x < last) {
            self.cursor.step_right();
        }
    }
}

/// One region of the screen. Only `Field`s accept edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    Label(Label),
    Field(Field),
}

impl Panel {
    pub fn label(x: u16, y: u16, text: impl Into<String>) -> Self {
        Panel::Label(Label::new(x, y, text))
    }

    pub fn field(x: u16, y: u16, width: u16, name: impl Into<String>) -> Self {
        Panel::Field(Field::new(x, y, width, name))
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, Panel::Field(_))
    }

    pub fn origin(&self) -> Position {
        match self {
            Panel::Label(l) => l.origin(),
            Panel::Field(f) => f.origin(),
        }
    }

    /// Field name; labels have none.
    pub fn name(&self) -> Option<&str> {
        self.as_field().map(Field::name)
    }

    /// Text to draw and where to draw it.
    pub fn render(&self) -> (&str, Position) {
        match self {
            Panel::Label(l) => (l.text(), l.origin()),
            Panel::Field(f) => (f.visible_text(), f.origin()),
        }
    }

    /// Width of the panel's box on screen.
    pub fn width(&self) -> u16 {
        match self {
            Panel::Label(l) => l.width(),
            Panel::Field(f) => f.width(),
        }
    }

    pub fn cursor_screen_position(&self) -> Position {
        match self {
            Panel::Label(l) => l.origin(),
            Panel::Field(f) => f.cursor_screen_position(),
        }
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Panel::Field(f) => Some(f),
            Panel::Label(_) => None,
        }
    }

    pub fn as_field_mut(&mut self) -> Option<&mut Field> {
        match self {
            Panel::Field(f) => Some(f),
            Panel::Label(_) => None,
        }
    }
}

impl From<Field> for Panel {
    fn from(field: Field) -> Self {
        Panel::Field(field)
    }
}

impl From<Label> for Panel {
    fn from(label: Label) -> Self {
        Panel::Label(label)
    }
}
