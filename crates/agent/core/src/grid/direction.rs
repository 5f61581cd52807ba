//! Eight-way compass directions with O(1) rotation tables.

use super::Position;

/// One of the 8 compass directions plus the `Center` "no movement" sentinel.
///
/// Ordinals follow clockwise compass order starting at north, so rotations
/// are index arithmetic modulo 8.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    #[default]
    Center,
}

const DX: [i32; 9] = [0, 1, 1, 1, 0, -1, -1, -1, 0];
const DY: [i32; 9] = [1, 1, 0, -1, -1, -1, 0, 1, 0];

const ROTATE_RIGHT: [Direction; 9] = [
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
    Direction::North,
    Direction::Center,
];

const ROTATE_LEFT: [Direction; 9] = [
    Direction::NorthWest,
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::Center,
];

const OPPOSITE: [Direction; 9] = [
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::Center,
];

// Indexed by [dx + 1][dy + 1].
const FROM_DELTA: [[Direction; 3]; 3] = [
    [Direction::SouthWest, Direction::West, Direction::NorthWest],
    [Direction::South, Direction::Center, Direction::North],
    [Direction::SouthEast, Direction::East, Direction::NorthEast],
];

impl Direction {
    /// The 8 movement directions in ordinal order (no `Center`).
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Clockwise ordinal, `8` for `Center`.
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Inverse of [`Direction::ordinal`] for values `0..8`; anything else is `Center`.
    #[inline]
    pub const fn from_ordinal(ordinal: usize) -> Direction {
        if ordinal < 8 {
            Self::ALL[ordinal]
        } else {
            Direction::Center
        }
    }

    /// Offset `(dx, dy)` of a single step. Y-axis increases northward.
    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        let i = self as usize;
        (DX[i], DY[i])
    }

    #[inline]
    pub const fn rotate_right(self) -> Direction {
        ROTATE_RIGHT[self as usize]
    }

    #[inline]
    pub const fn rotate_left(self) -> Direction {
        ROTATE_LEFT[self as usize]
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        OPPOSITE[self as usize]
    }

    #[inline]
    pub const fn is_center(self) -> bool {
        matches!(self, Direction::Center)
    }

    /// Direction from a unit delta; components are clamped to `-1..=1`.
    #[inline]
    pub const fn from_delta(dx: i32, dy: i32) -> Direction {
        let sx = if dx > 0 { 2 } else if dx < 0 { 0 } else { 1 };
        let sy = if dy > 0 { 2 } else if dy < 0 { 0 } else { 1 };
        FROM_DELTA[sx][sy]
    }

    /// Eight-way direction pointing from `from` toward `to`.
    ///
    /// Picks a diagonal only when the minor axis is at least
    /// `tan(22.5°)` of the major axis, so near-straight lines stay straight.
    pub fn toward(from: Position, to: Position) -> Direction {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx == 0 && dy == 0 {
            return Direction::Center;
        }
        let (ax, ay) = (dx.abs() as i64, dy.abs() as i64);
        // 5/12 approximates tan(22.5°) = 0.414 in integer space.
        let dx = if ax * 12 < ay * 5 { 0 } else { dx };
        let dy = if ay * 12 < ax * 5 { 0 } else { dy };
        Direction::from_delta(dx, dy)
    }
}
