//! Typed slot table: every shared slot, its encoding and its staleness rule.
//!
//! Call sites never shift or mask by hand; they look the slot up here and go
//! through the codec.

use crate::config::ChannelConfig;

use super::codec::SlotFormat;

/// Health values are stored divided by this.
pub const HEALTH_DIVISOR: u16 = 8;
/// Offset applied to the signed army advantage.
pub const ADVANTAGE_OFFSET: u16 = 50;

/// Which staleness limit applies to a stamped group of slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Staleness {
    /// Refreshed by the leader every `write_interval` ticks; absent once the
    /// leader has been silent for longer than `sighting_stale_ticks`.
    Leader,
    Focus,
    Resource,
    AllIn,
    Sighting,
}

impl Staleness {
    /// Limit in ticks for this rule under `config`.
    pub const fn limit(self, config: &ChannelConfig) -> u16 {
        match self {
            Self::Leader => config.sighting_stale_ticks,
            Self::Focus => config.focus_stale_ticks,
            Self::Resource => config.resource_stale_ticks,
            Self::AllIn => config.all_in_duration,
            Self::Sighting => config.sighting_stale_ticks,
        }
    }
}

/// How often a cached reader refreshes a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadCadence {
    EveryTick,
    Positions,
    Strategy,
    Ring,
}

impl ReadCadence {
    pub const fn interval(self, config: &ChannelConfig) -> u32 {
        match self {
            Self::EveryTick => 1,
            Self::Positions => config.position_cache_interval,
            Self::Strategy => config.strategy_cache_interval,
            Self::Ring => config.ring_cache_interval,
        }
    }
}

/// Static description of one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotSpec {
    pub format: SlotFormat,
    /// Stamp slot guarding this value, if any.
    pub stamp: Option<Slot>,
    pub staleness: Option<Staleness>,
    pub cadence: ReadCadence,
}

impl SlotSpec {
    const fn plain(format: SlotFormat, cadence: ReadCadence) -> Self {
        Self {
            format,
            stamp: None,
            staleness: None,
            cadence,
        }
    }

    const fn guarded(
        format: SlotFormat,
        stamp: Slot,
        staleness: Staleness,
        cadence: ReadCadence,
    ) -> Self {
        Self {
            format,
            stamp: Some(stamp),
            staleness: Some(staleness),
            cadence,
        }
    }
}

/// Every slot of the shared channel, in index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Slot {
    OwnLeaderPos,
    OwnLeaderHealth,
    OwnLeaderStamp,
    HostileLeaderPos,
    HostileLeaderHealth,
    HostileLeaderConfirmed,
    HostileLeaderStamp,
    FocusPos,
    FocusHealth,
    FocusStamp,
    GameState,
    Commitment,
    ThreatLevel,
    ArmyAdvantage,
    KillCount,
    OpponentKind,
    AttackWindow,
    PostRushPhase,
    RushSurvivedStamp,
    AllInStamp,
    HostilesNearLeader,
    HostilesSeen,
    Resource0,
    Resource1,
    Resource2,
    ResourceStamp,
    Sighting0,
    Sighting1,
    Sighting2,
    Sighting3,
    SightingHead,
    SightingStamp,
}

impl Slot {
    pub const ALL: [Slot; 32] = [
        Slot::OwnLeaderPos,
        Slot::OwnLeaderHealth,
        Slot::OwnLeaderStamp,
        Slot::HostileLeaderPos,
        Slot::HostileLeaderHealth,
        Slot::HostileLeaderConfirmed,
        Slot::HostileLeaderStamp,
        Slot::FocusPos,
        Slot::FocusHealth,
        Slot::FocusStamp,
        Slot::GameState,
        Slot::Commitment,
        Slot::ThreatLevel,
        Slot::ArmyAdvantage,
        Slot::KillCount,
        Slot::OpponentKind,
        Slot::AttackWindow,
        Slot::PostRushPhase,
        Slot::RushSurvivedStamp,
        Slot::AllInStamp,
        Slot::HostilesNearLeader,
        Slot::HostilesSeen,
        Slot::Resource0,
        Slot::Resource1,
        Slot::Resource2,
        Slot::ResourceStamp,
        Slot::Sighting0,
        Slot::Sighting1,
        Slot::Sighting2,
        Slot::Sighting3,
        Slot::SightingHead,
        Slot::SightingStamp,
    ];

    pub const RESOURCES: [Slot; 3] = [Slot::Resource0, Slot::Resource1, Slot::Resource2];
    pub const SIGHTINGS: [Slot; 4] = [
        Slot::Sighting0,
        Slot::Sighting1,
        Slot::Sighting2,
        Slot::Sighting3,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Slot> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    pub const fn spec(self) -> SlotSpec {
        use ReadCadence::*;
        use SlotFormat::*;
        match self {
            Slot::OwnLeaderPos => SlotSpec::guarded(
                HalvedPoint,
                Slot::OwnLeaderStamp,
                Staleness::Leader,
                Positions,
            ),
            Slot::OwnLeaderHealth => SlotSpec::guarded(
                Scaled(HEALTH_DIVISOR),
                Slot::OwnLeaderStamp,
                Staleness::Leader,
                EveryTick,
            ),
            Slot::HostileLeaderPos => SlotSpec::guarded(
                HalvedPoint,
                Slot::HostileLeaderStamp,
                Staleness::Sighting,
                Positions,
            ),
            Slot::HostileLeaderHealth => SlotSpec::guarded(
                Scaled(HEALTH_DIVISOR),
                Slot::HostileLeaderStamp,
                Staleness::Sighting,
                EveryTick,
            ),
            Slot::HostileLeaderConfirmed => SlotSpec::plain(Raw, Positions),
            Slot::FocusPos => {
                SlotSpec::guarded(HalvedPoint, Slot::FocusStamp, Staleness::Focus, EveryTick)
            }
            Slot::FocusHealth => {
                SlotSpec::guarded(Raw, Slot::FocusStamp, Staleness::Focus, EveryTick)
            }
            Slot::GameState => SlotSpec::plain(Raw, EveryTick),
            Slot::ArmyAdvantage => SlotSpec::plain(Offset(ADVANTAGE_OFFSET), Strategy),
            Slot::Commitment
            | Slot::ThreatLevel
            | Slot::KillCount
            | Slot::OpponentKind
            | Slot::AttackWindow
            | Slot::PostRushPhase
            | Slot::HostilesNearLeader
            | Slot::HostilesSeen => SlotSpec::plain(Raw, Strategy),
            Slot::Resource0 | Slot::Resource1 | Slot::Resource2 => SlotSpec::guarded(
                HalvedPoint,
                Slot::ResourceStamp,
                Staleness::Resource,
                Ring,
            ),
            Slot::Sighting0 | Slot::Sighting1 | Slot::Sighting2 | Slot::Sighting3 => {
                SlotSpec::guarded(HalvedPoint, Slot::SightingStamp, Staleness::Sighting, Ring)
            }
            Slot::SightingHead => SlotSpec::plain(Raw, Ring),
            Slot::AllInStamp => SlotSpec::plain(Stamp, EveryTick),
            Slot::RushSurvivedStamp => SlotSpec::plain(Stamp, Strategy),
            Slot::OwnLeaderStamp | Slot::HostileLeaderStamp | Slot::FocusStamp => {
                SlotSpec::plain(Stamp, EveryTick)
            }
            Slot::ResourceStamp | Slot::SightingStamp => SlotSpec::plain(Stamp, Ring),
        }
    }

    #[inline]
    pub const fn format(self) -> SlotFormat {
        self.spec().format
    }
}
