//! Grid geometry primitives: positions, compass directions, hazard masks.
//!
//! Everything here is integer-only and `Copy`; these types sit on every hot
//! path of the navigator and the value function.
mod direction;
mod hazard;
mod position;

pub use direction::Direction;
pub use hazard::HazardMask;
pub use position::Position;
