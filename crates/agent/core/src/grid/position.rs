use core::fmt;

use super::Direction;

/// Discrete grid position expressed in tile coordinates.
///
/// Y grows northward, X grows eastward. Distances are squared Euclidean so
/// hot paths never touch floating point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub const fn distance_sq(self, other: Position) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Returns the neighbouring position one step in `direction`.
    #[inline]
    pub const fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        Position::new(self.x + dx, self.y + dy)
    }

    /// True when `other` is one of the 8 neighbours (or the same tile).
    #[inline]
    pub const fn is_adjacent(self, other: Position) -> bool {
        self.distance_sq(other) <= 2
    }

    /// Direction that moves from `self` toward `target`.
    #[inline]
    pub fn direction_to(self, target: Position) -> Direction {
        Direction::toward(self, target)
    }

    /// True when the position lies inside a `width` x `height` grid anchored at the origin.
    #[inline]
    pub const fn within(self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < width && self.y < height
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_squared_euclidean() {
        let a = Position::new(10, 10);
        assert_eq!(a.distance_sq(Position::new(10, 15)), 25);
        assert_eq!(a.distance_sq(Position::new(13, 14)), 25);
        assert_eq!(a.distance_sq(a), 0);
    }

    #[test]
    fn adjacency_includes_diagonals() {
        let a = Position::new(3, 3);
        assert!(a.is_adjacent(Position::new(4, 4)));
        assert!(a.is_adjacent(Position::new(3, 2)));
        assert!(!a.is_adjacent(Position::new(5, 3)));
    }

    #[test]
    fn step_follows_compass_offsets() {
        let a = Position::new(0, 0);
        assert_eq!(a.step(Direction::North), Position::new(0, 1));
        assert_eq!(a.step(Direction::SouthWest), Position::new(-1, -1));
        assert_eq!(a.step(Direction::Center), a);
    }
}
