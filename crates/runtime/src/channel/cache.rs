use agent_core::{AgentConfig, ChannelConfig, Slot, SlotValue, Tick, decode, is_fresh};

use crate::api::ChannelIo;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CachedSlot {
    raw: u16,
    read_at: Tick,
}

/// Per-agent read cache over the shared channel.
///
/// A slot is re-read from the host once its cadence interval has elapsed
/// since the last read; until then the cached raw value is returned.
#[derive(Clone, Debug)]
pub struct ChannelCache {
    entries: [Option<CachedSlot>; AgentConfig::SLOT_COUNT],
    host_reads: u32,
}

impl Default for ChannelCache {
    fn default() -> Self {
        Self {
            entries: [None; AgentConfig::SLOT_COUNT],
            host_reads: 0,
        }
    }
}

impl ChannelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total reads that reached the host.
    pub fn host_reads(&self) -> u32 {
        self.host_reads
    }

    /// Raw slot contents, refreshed according to the slot's cadence.
    pub fn raw(&mut self, io: &impl ChannelIo, slot: Slot, now: Tick, config: &ChannelConfig) -> u16 {
        let interval = slot.spec().cadence.interval(config).max(1);
        if let Some(cached) = self.entries[slot.index()] {
            if now.since(cached.read_at) < interval {
                return cached.raw;
            }
        }
        let raw = io.read_slot(slot.index());
        tracing::trace!("channel read {} = {}", slot, raw);
        self.host_reads = self.host_reads.saturating_add(1);
        self.entries[slot.index()] = Some(CachedSlot { raw, read_at: now });
        raw
    }

    /// Decoded slot contents, ignoring staleness.
    pub fn value(
        &mut self,
        io: &impl ChannelIo,
        slot: Slot,
        now: Tick,
        config: &ChannelConfig,
    ) -> SlotValue {
        decode(self.raw(io, slot, now, config), slot.format())
    }

    /// Decoded slot contents, or `None` when the guarding stamp is missing or
    /// older than the slot's staleness limit. Unguarded slots are always
    /// returned.
    pub fn fresh(
        &mut self,
        io: &impl ChannelIo,
        slot: Slot,
        now: Tick,
        config: &ChannelConfig,
    ) -> Option<SlotValue> {
        let spec = slot.spec();
        if let (Some(stamp_slot), Some(rule)) = (spec.stamp, spec.staleness) {
            let stamp = self.raw(io, stamp_slot, now, config);
            if !is_fresh(stamp, now, rule.limit(config)) {
                return None;
            }
        }
        Some(self.value(io, slot, now, config))
    }

    /// Forces the next read of `slot` to reach the host.
    pub fn invalidate(&mut self, slot: Slot) {
        self.entries[slot.index()] = None;
    }

    pub fn clear(&mut self) {
        self.entries = [None; AgentConfig::SLOT_COUNT];
    }
}
