use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Represents a point in integer screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, other: Position) -> Position {
        Position::new(self.x.saturating_add(other.x), self.y.saturating_add(other.y))
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, other: Position) -> Position {
        Position::new(self.x.saturating_sub(other.x), self.y.saturating_sub(other.y))
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_arithmetic() {
        let p = Position::new(10, 20) + Position::new(5, -5);
        assert_eq!(p, Position::new(15, 15));
        assert_eq!(p - Position::new(15, 15), Position::ORIGIN);
    }

    #[test]
    fn test_position_arithmetic_saturates() {
        let far = Position::new(i32::MAX, i32::MIN);
        assert_eq!(far + Position::new(100, -1), Position::new(i32::MAX, i32::MIN));
        assert_eq!(far - Position::new(-5, 5), Position::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(100, 0).to_string(), "(100,0)");
        assert_eq!(Position::new(-3, 7).to_string(), "(-3,7)");
    }
}
