use bitflags::bitflags;

use super::Direction;

bitflags! {
    /// Per-tick mask of the 8 neighbouring cells that must be avoided.
    ///
    /// Bit `i` corresponds to [`Direction::from_ordinal(i)`](Direction::from_ordinal).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HazardMask: u8 {
        const NORTH = 1 << 0;
        const NORTH_EAST = 1 << 1;
        const EAST = 1 << 2;
        const SOUTH_EAST = 1 << 3;
        const SOUTH = 1 << 4;
        const SOUTH_WEST = 1 << 5;
        const WEST = 1 << 6;
        const NORTH_WEST = 1 << 7;
    }
}

impl HazardMask {
    /// Flag for a single direction. `Center` maps to the empty mask.
    #[inline]
    pub const fn of(direction: Direction) -> Self {
        if direction.is_center() {
            Self::empty()
        } else {
            Self::from_bits_retain(1 << direction.ordinal())
        }
    }

    #[inline]
    pub const fn is_hazardous(self, direction: Direction) -> bool {
        !direction.is_center() && self.bits() & (1 << direction.ordinal()) != 0
    }

    #[inline]
    pub fn mark(&mut self, direction: Direction) {
        self.insert(Self::of(direction));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_direction_ordinals() {
        assert_eq!(HazardMask::of(Direction::North), HazardMask::NORTH);
        assert_eq!(HazardMask::of(Direction::NorthWest), HazardMask::NORTH_WEST);
        assert_eq!(HazardMask::of(Direction::Center), HazardMask::empty());
    }

    #[test]
    fn mark_accumulates() {
        let mut mask = HazardMask::empty();
        mask.mark(Direction::East);
        mask.mark(Direction::South);
        assert!(mask.is_hazardous(Direction::East));
        assert!(mask.is_hazardous(Direction::South));
        assert!(!mask.is_hazardous(Direction::North));
        assert!(!mask.is_hazardous(Direction::Center));
    }
}
