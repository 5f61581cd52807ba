//! Slot encodings and wraparound-safe tick stamps.
//!
//! Every slot holds an unsigned 10-bit value. Formats describe how a domain
//! value maps into that range and back; [`encode`] is strict and reports
//! anything that does not fit, [`encode_saturating`] clamps instead.

use crate::config::AgentConfig;
use crate::error::{AgentError, ErrorSeverity};
use crate::grid::Position;
use crate::sensing::Tick;

/// Number of distinct non-zero stamp values. Stamps cycle through `1..=STAMP_PERIOD`.
pub const STAMP_PERIOD: u32 = AgentConfig::SLOT_MAX as u32;

const SLOT_MAX: i32 = AgentConfig::SLOT_MAX as i32;
const HALF_BITS: u32 = 5;
const HALF_MASK: u16 = (1 << HALF_BITS) - 1;
/// Largest coordinate representable by [`SlotFormat::HalvedPoint`].
pub const MAX_HALVED_COORD: i32 = ((HALF_MASK as i32) << 1) | 1;

/// How a domain value is laid out inside one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotFormat {
    /// Plain count in `0..=1023`.
    Raw,
    /// Signed value stored as `value + offset`.
    Offset(u16),
    /// Value divided by a fixed divisor; decoding rounds down to a multiple.
    Scaled(u16),
    /// `(x >> 1) | (y >> 1) << 5`; decoded coordinates are even.
    HalvedPoint,
    /// Tick stored as `(tick mod 1023) + 1`; `0` means never stamped.
    Stamp,
}

/// Decoded slot contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotValue {
    Scalar(i32),
    Point(Position),
    /// Raw stamp; `0` when never written. Use [`age_of`] to interpret it.
    Stamp(u16),
}

impl SlotValue {
    pub const fn scalar(self) -> Option<i32> {
        match self {
            Self::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub const fn point(self) -> Option<Position> {
        match self {
            Self::Point(p) => Some(p),
            _ => None,
        }
    }

    pub const fn stamp(self) -> Option<u16> {
        match self {
            Self::Stamp(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("value {value} does not fit {format:?}")]
    OutOfRange { value: i32, format: SlotFormat },

    #[error("point {position} cannot be packed into a slot")]
    PointOutOfRange { position: Position },

    #[error("{value:?} cannot be stored as {format:?}")]
    FormatMismatch { value: SlotValue, format: SlotFormat },

    #[error("scaled format with zero divisor")]
    ZeroDivisor,
}

impl AgentError for CodecError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OutOfRange { .. } | Self::PointOutOfRange { .. } => ErrorSeverity::Validation,
            Self::FormatMismatch { .. } | Self::ZeroDivisor => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "CODEC_OUT_OF_RANGE",
            Self::PointOutOfRange { .. } => "CODEC_POINT_OUT_OF_RANGE",
            Self::FormatMismatch { .. } => "CODEC_FORMAT_MISMATCH",
            Self::ZeroDivisor => "CODEC_ZERO_DIVISOR",
        }
    }
}

/// Raw stamp for `tick`. Never returns `0`.
#[inline]
pub const fn stamp_of(tick: Tick) -> u16 {
    (tick.0 % STAMP_PERIOD + 1) as u16
}

/// Ticks elapsed between a stored stamp and `now`.
///
/// Returns `None` when the stamp was never written. Ages are exact up to
/// `STAMP_PERIOD - 1` and then alias, so staleness limits must stay below it.
#[inline]
pub const fn age_of(stamp: u16, now: Tick) -> Option<u32> {
    if stamp == 0 {
        return None;
    }
    let current = stamp_of(now) as u32;
    Some((current + STAMP_PERIOD - stamp as u32) % STAMP_PERIOD)
}

/// True when the stamp exists and is at most `limit` ticks old.
#[inline]
pub const fn is_fresh(stamp: u16, now: Tick, limit: u16) -> bool {
    match age_of(stamp, now) {
        Some(age) => age <= limit as u32,
        None => false,
    }
}

/// Encodes `value` into a slot, rejecting anything outside the format's range.
pub fn encode(value: SlotValue, format: SlotFormat) -> Result<u16, CodecError> {
    match (format, value) {
        (SlotFormat::Raw, SlotValue::Scalar(v)) => fit(v, format),
        (SlotFormat::Offset(offset), SlotValue::Scalar(v)) => v
            .checked_add(offset as i32)
            .ok_or(CodecError::OutOfRange { value: v, format })
            .and_then(|shifted| fit(shifted, format))
            .map_err(|_| CodecError::OutOfRange { value: v, format }),
        (SlotFormat::Scaled(0), SlotValue::Scalar(_)) => Err(CodecError::ZeroDivisor),
        (SlotFormat::Scaled(divisor), SlotValue::Scalar(v)) => {
            if v < 0 {
                return Err(CodecError::OutOfRange { value: v, format });
            }
            fit(v / divisor as i32, format).map_err(|_| CodecError::OutOfRange { value: v, format })
        }
        (SlotFormat::HalvedPoint, SlotValue::Point(p)) => pack_point(p),
        (SlotFormat::Stamp, SlotValue::Stamp(s)) if (s as u32) <= STAMP_PERIOD => Ok(s),
        (SlotFormat::Stamp, SlotValue::Stamp(s)) => Err(CodecError::OutOfRange {
            value: s as i32,
            format,
        }),
        _ => Err(CodecError::FormatMismatch { value, format }),
    }
}

/// Like [`encode`] but clamps scalars into range. Points and stamps are still checked.
pub fn encode_saturating(value: SlotValue, format: SlotFormat) -> Result<u16, CodecError> {
    let clamped = match (format, value) {
        (SlotFormat::Raw, SlotValue::Scalar(v)) => SlotValue::Scalar(v.clamp(0, SLOT_MAX)),
        (SlotFormat::Offset(offset), SlotValue::Scalar(v)) => {
            let offset = offset as i32;
            SlotValue::Scalar(v.clamp(-offset, SLOT_MAX - offset))
        }
        (SlotFormat::Scaled(divisor), SlotValue::Scalar(v)) if divisor > 0 => {
            let max = SLOT_MAX * divisor as i32 + (divisor as i32 - 1);
            SlotValue::Scalar(v.clamp(0, max))
        }
        _ => value,
    };
    encode(clamped, format)
}

/// Decodes a raw slot. Values above the 10-bit range are masked.
pub fn decode(raw: u16, format: SlotFormat) -> SlotValue {
    let raw = raw & AgentConfig::SLOT_MAX;
    match format {
        SlotFormat::Raw => SlotValue::Scalar(raw as i32),
        SlotFormat::Offset(offset) => SlotValue::Scalar(raw as i32 - offset as i32),
        SlotFormat::Scaled(divisor) => SlotValue::Scalar(raw as i32 * divisor as i32),
        SlotFormat::HalvedPoint => SlotValue::Point(unpack_point(raw)),
        SlotFormat::Stamp => SlotValue::Stamp(raw),
    }
}

fn fit(v: i32, format: SlotFormat) -> Result<u16, CodecError> {
    if (0..=SLOT_MAX).contains(&v) {
        Ok(v as u16)
    } else {
        Err(CodecError::OutOfRange { value: v, format })
    }
}

fn pack_point(p: Position) -> Result<u16, CodecError> {
    let in_range = |c: i32| (0..=MAX_HALVED_COORD).contains(&c);
    if !in_range(p.x) || !in_range(p.y) {
        return Err(CodecError::PointOutOfRange { position: p });
    }
    let hx = (p.x >> 1) as u16 & HALF_MASK;
    let hy = (p.y >> 1) as u16 & HALF_MASK;
    Ok(hx | (hy << HALF_BITS))
}

const fn unpack_point(raw: u16) -> Position {
    let hx = (raw & HALF_MASK) as i32;
    let hy = ((raw >> HALF_BITS) & HALF_MASK) as i32;
    Position::new(hx << 1, hy << 1)
}
