//! Shared channel protocol: slot codec, typed slot table, broadcast messages.
//!
//! The channel is a fixed array of 10-bit slots plus a best-effort message
//! queue. It is the only state shared between agents and is eventually
//! consistent: readers must tolerate absent, stale or contradictory values.
mod codec;
mod message;
mod slots;

pub use codec::{
    CodecError, MAX_HALVED_COORD, STAMP_PERIOD, SlotFormat, SlotValue, age_of, decode, encode,
    encode_saturating, is_fresh, stamp_of,
};
pub use message::{HEALTH_BUCKET, Message};
pub use slots::{ADVANTAGE_OFFSET, HEALTH_DIVISOR, ReadCadence, Slot, SlotSpec, Staleness};
