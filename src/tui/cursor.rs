/// A terminal cell coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Position { x, y }
    }
}

/// A bare coordinate holder. Bounds are enforced by the owning field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub(super) x: u16,
    pub(super) y: u16,
}

impl Cursor {
    pub fn new(x: u16, y: u16) -> Self {
        Cursor { x, y }
    }

    pub fn position(self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
    }

    /// Never goes below column zero.
    pub fn step_left(&mut self) {
        self.x = self.x.saturating_sub(1);
    }

    pub fn step_right(&mut self) {
        self.x = self.x.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_left_stops_at_zero() {
        let mut c = Cursor::new(1, 4);
        c.step_left();
        c.step_left();
        assert_eq!(c.position(), Position::new(0, 4));
    }

    #[test]
    fn move_to_is_unconditional() {
        let mut c = Cursor::new(3, 3);
        c.move_to(40, 7);
        c.step_right();
        assert_eq!(c.position(), Position::new(41, 7));
    }
}
