//! Best-effort 32-bit broadcast messages.
//!
//! Layout: bits 31..28 carry the message type, the remaining 28 bits are
//! type-specific. Messages that fail to decode are dropped by the reader.

use crate::grid::Position;

use super::codec::CodecError;

const TYPE_SHIFT: u32 = 28;
const COORD_BITS: u32 = 12;
const COORD_MASK: u32 = (1 << COORD_BITS) - 1;
const X_SHIFT: u32 = 4;
const Y_SHIFT: u32 = X_SHIFT + COORD_BITS;

/// Health is reported in buckets of this size.
pub const HEALTH_BUCKET: i32 = 35;
const MAX_HEALTH_BUCKET: u32 = 0xF;
const MAX_KILLS: u32 = (1 << TYPE_SHIFT) - 1;

const KIND_LEADER_SIGHTING: u32 = 1;
const KIND_RESOURCE_SIGHTING: u32 = 2;
const KIND_KILL_CONFIRMED: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    /// A hostile leader was seen. Health is rounded down to a bucket.
    LeaderSighting { position: Position, health: i32 },
    ResourceSighting { position: Position },
    KillConfirmed { count: u32 },
}

impl Message {
    pub fn encode(&self) -> Result<u32, CodecError> {
        match *self {
            Message::LeaderSighting { position, health } => {
                let bucket = (health.max(0) / HEALTH_BUCKET) as u32;
                Ok(KIND_LEADER_SIGHTING << TYPE_SHIFT
                    | pack_position(position)?
                    | bucket.min(MAX_HEALTH_BUCKET))
            }
            Message::ResourceSighting { position } => {
                Ok(KIND_RESOURCE_SIGHTING << TYPE_SHIFT | pack_position(position)?)
            }
            Message::KillConfirmed { count } => {
                Ok(KIND_KILL_CONFIRMED << TYPE_SHIFT | count.min(MAX_KILLS))
            }
        }
    }

    /// Decodes a received word, returning `None` for unknown types.
    pub fn decode(bits: u32) -> Option<Message> {
        match bits >> TYPE_SHIFT {
            KIND_LEADER_SIGHTING => Some(Message::LeaderSighting {
                position: unpack_position(bits),
                health: (bits & MAX_HEALTH_BUCKET) as i32 * HEALTH_BUCKET,
            }),
            KIND_RESOURCE_SIGHTING => Some(Message::ResourceSighting {
                position: unpack_position(bits),
            }),
            KIND_KILL_CONFIRMED => Some(Message::KillConfirmed {
                count: bits & MAX_KILLS,
            }),
            _ => None,
        }
    }
}

fn pack_position(position: Position) -> Result<u32, CodecError> {
    let limit = COORD_MASK as i32;
    if !(0..=limit).contains(&position.x) || !(0..=limit).contains(&position.y) {
        return Err(CodecError::PointOutOfRange { position });
    }
    Ok((position.x as u32) << X_SHIFT | (position.y as u32) << Y_SHIFT)
}

fn unpack_position(bits: u32) -> Position {
    Position::new(
        ((bits >> X_SHIFT) & COORD_MASK) as i32,
        ((bits >> Y_SHIFT) & COORD_MASK) as i32,
    )
}
