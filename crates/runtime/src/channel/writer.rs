use agent_core::{
    AgentConfig, ChannelConfig, Slot, SlotValue, Tick, encode_saturating, stamp_of,
};

use crate::api::{ChannelError, ChannelIo};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Written {
    raw: u16,
    at: Tick,
}

/// Leader-side write suppression.
///
/// A value slot is written when its encoded value differs from the last
/// write, or as a heartbeat once `write_interval` ticks have passed.
/// [`SlotWriter::publish_on_change`] skips the heartbeat. Stamp slots are
/// written explicitly through [`SlotWriter::stamp`].
#[derive(Clone, Debug)]
pub struct SlotWriter {
    last: [Option<Written>; AgentConfig::SLOT_COUNT],
    writes: u32,
}

impl Default for SlotWriter {
    fn default() -> Self {
        Self {
            last: [None; AgentConfig::SLOT_COUNT],
            writes: 0,
        }
    }
}

impl SlotWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total writes that reached the host.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Encodes and writes `value` if it changed or its heartbeat is due.
    ///
    /// Returns whether a write reached the host. Scalars are clamped into
    /// the slot's range; unpackable points are reported as errors.
    pub fn publish(
        &mut self,
        io: &mut impl ChannelIo,
        slot: Slot,
        value: SlotValue,
        now: Tick,
        config: &ChannelConfig,
    ) -> Result<bool, ChannelError> {
        self.put(io, slot, value, now, Some(config.write_interval))
    }

    /// Like [`SlotWriter::publish`] without the heartbeat: an unchanged
    /// value is never rewritten.
    pub fn publish_on_change(
        &mut self,
        io: &mut impl ChannelIo,
        slot: Slot,
        value: SlotValue,
        now: Tick,
    ) -> Result<bool, ChannelError> {
        self.put(io, slot, value, now, None)
    }

    fn put(
        &mut self,
        io: &mut impl ChannelIo,
        slot: Slot,
        value: SlotValue,
        now: Tick,
        heartbeat: Option<u32>,
    ) -> Result<bool, ChannelError> {
        let raw = encode_saturating(value, slot.format())?;
        let due = match self.last[slot.index()] {
            None => true,
            Some(prev) => prev.raw != raw || heartbeat.is_some_and(|every| now.since(prev.at) >= every),
        };
        if !due {
            return Ok(false);
        }
        self.write(io, slot, raw, now)?;
        Ok(true)
    }

    /// Stamps `slot` with `now` when `refresh` is set or the last stamp is
    /// older than `write_interval`.
    pub fn stamp(
        &mut self,
        io: &mut impl ChannelIo,
        slot: Slot,
        refresh: bool,
        now: Tick,
        config: &ChannelConfig,
    ) -> Result<bool, ChannelError> {
        let due = refresh
            || self.last[slot.index()].is_none_or(|prev| now.since(prev.at) >= config.write_interval);
        if !due {
            return Ok(false);
        }
        self.write(io, slot, stamp_of(now), now)?;
        Ok(true)
    }

    /// Clears a stamp so readers treat the guarded group as absent.
    pub fn clear_stamp(&mut self, io: &mut impl ChannelIo, slot: Slot, now: Tick) -> Result<bool, ChannelError> {
        if self.last[slot.index()].is_some_and(|prev| prev.raw == 0) {
            return Ok(false);
        }
        self.write(io, slot, 0, now)?;
        Ok(true)
    }

    fn write(&mut self, io: &mut impl ChannelIo, slot: Slot, raw: u16, now: Tick) -> Result<(), ChannelError> {
        io.write_slot(slot.index(), raw)?;
        tracing::trace!("channel write {} = {}", slot, raw);
        self.last[slot.index()] = Some(Written { raw, at: now });
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MessageBatch;
    use agent_core::Position;

    struct RecordingChannel {
        slots: [u16; AgentConfig::SLOT_COUNT],
        writes: Vec<(usize, u16)>,
        locked: bool,
    }

    impl Default for RecordingChannel {
        fn default() -> Self {
            Self {
                slots: [0; AgentConfig::SLOT_COUNT],
                writes: Vec::new(),
                locked: false,
            }
        }
    }

    impl ChannelIo for RecordingChannel {
        fn read_slot(&self, index: usize) -> u16 {
            self.slots[index]
        }

        fn write_slot(&mut self, index: usize, value: u16) -> Result<(), ChannelError> {
            if self.locked {
                return Err(ChannelError::NotWriter { index });
            }
            self.slots[index] = value;
            self.writes.push((index, value));
            Ok(())
        }

        fn broadcast(&mut self, _bits: u32) -> Result<(), ChannelError> {
            Ok(())
        }

        fn receive_recent(&self, _limit: usize) -> MessageBatch {
            MessageBatch::new()
        }
    }

    #[test]
    fn unchanged_values_wait_for_heartbeat() {
        let config = ChannelConfig::default();
        let mut io = RecordingChannel::default();
        let mut writer = SlotWriter::new();
        let value = SlotValue::Scalar(3);

        assert!(writer.publish(&mut io, Slot::ThreatLevel, value, Tick(0), &config).unwrap());
        for t in 1..config.write_interval {
            assert!(!writer.publish(&mut io, Slot::ThreatLevel, value, Tick(t), &config).unwrap());
        }
        assert!(
            writer
                .publish(&mut io, Slot::ThreatLevel, value, Tick(config.write_interval), &config)
                .unwrap()
        );
        assert!(
            writer
                .publish(&mut io, Slot::ThreatLevel, SlotValue::Scalar(4), Tick(11), &config)
                .unwrap()
        );
        assert_eq!(io.writes.len(), 3);
        assert_eq!(writer.writes(), 3);
    }

    #[test]
    fn change_only_slots_skip_the_heartbeat() {
        let config = ChannelConfig::default();
        let mut io = RecordingChannel::default();
        let mut writer = SlotWriter::new();
        let value = SlotValue::Scalar(2);

        assert!(writer.publish_on_change(&mut io, Slot::Commitment, value, Tick(0)).unwrap());
        for t in 1..=3 * config.write_interval {
            assert!(!writer.publish_on_change(&mut io, Slot::Commitment, value, Tick(t)).unwrap());
        }
        assert!(
            writer
                .publish_on_change(&mut io, Slot::Commitment, SlotValue::Scalar(3), Tick(40))
                .unwrap()
        );
        assert_eq!(io.writes.len(), 2);
    }

    #[test]
    fn values_are_clamped_and_points_checked() {
        let config = ChannelConfig::default();
        let mut io = RecordingChannel::default();
        let mut writer = SlotWriter::new();
        writer
            .publish(&mut io, Slot::ArmyAdvantage, SlotValue::Scalar(-400), Tick(1), &config)
            .unwrap();
        assert_eq!(io.slots[Slot::ArmyAdvantage.index()], 0);

        let err = writer
            .publish(
                &mut io,
                Slot::FocusPos,
                SlotValue::Point(Position::new(90, 1)),
                Tick(1),
                &config,
            )
            .unwrap_err();
        assert!(matches!(err, ChannelError::Codec(_)));
    }

    #[test]
    fn stamps_refresh_on_demand_or_heartbeat() {
        let config = ChannelConfig::default();
        let mut io = RecordingChannel::default();
        let mut writer = SlotWriter::new();

        assert!(writer.stamp(&mut io, Slot::OwnLeaderStamp, false, Tick(5), &config).unwrap());
        assert!(!writer.stamp(&mut io, Slot::OwnLeaderStamp, false, Tick(6), &config).unwrap());
        assert!(writer.stamp(&mut io, Slot::OwnLeaderStamp, true, Tick(7), &config).unwrap());
        assert_eq!(io.slots[Slot::OwnLeaderStamp.index()], stamp_of(Tick(7)));

        assert!(writer.clear_stamp(&mut io, Slot::OwnLeaderStamp, Tick(8)).unwrap());
        assert!(!writer.clear_stamp(&mut io, Slot::OwnLeaderStamp, Tick(9)).unwrap());
        assert_eq!(io.slots[Slot::OwnLeaderStamp.index()], 0);
    }

    #[test]
    fn rejected_writes_are_not_recorded() {
        let config = ChannelConfig::default();
        let mut io = RecordingChannel {
            locked: true,
            ..RecordingChannel::default()
        };
        let mut writer = SlotWriter::new();
        assert!(writer.publish(&mut io, Slot::KillCount, SlotValue::Scalar(1), Tick(0), &config).is_err());
        io.locked = false;
        assert!(writer.publish(&mut io, Slot::KillCount, SlotValue::Scalar(1), Tick(1), &config).unwrap());
    }
}
