use agent_core::{
    AgentConfig, AttackWindow, ChannelConfig, Commitment, GameState, OpponentKind, Position,
    PostRushPhase, Situation, Slot, Staleness, Tick, is_fresh,
};
use arrayvec::ArrayVec;

use super::ChannelCache;
use crate::api::ChannelIo;

/// Cursor value for the sighting ring after `written` total entries.
///
/// Below the ring size the cursor is the fill count; once the ring is full
/// it is `ring + next_index`, so readers can tell unwritten slots apart.
pub fn sighting_cursor(written: u32) -> i32 {
    let ring = Slot::SIGHTINGS.len() as u32;
    if written < ring {
        written as i32
    } else {
        (ring + written % ring) as i32
    }
}

/// Splits a cursor into (next write index, filled entries).
fn ring_cursor(cursor: i32) -> (usize, usize) {
    let ring = Slot::SIGHTINGS.len();
    let cursor = cursor.clamp(0, 2 * ring as i32 - 1) as usize;
    (cursor % ring, cursor.min(ring))
}

/// Everything a non-leader reads from the channel in one tick.
///
/// Strategy slots are trusted only while the own-leader stamp is fresh;
/// without a live leader they fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeamView {
    pub own_leader: Option<Position>,
    pub own_leader_health: Option<i32>,
    pub hostile_leader: Option<Position>,
    pub hostile_leader_health: Option<i32>,
    pub hostile_leader_confirmed: bool,
    pub focus: Option<Position>,
    pub focus_health: Option<i32>,
    pub game_state: GameState,
    pub commitment: Commitment,
    pub window: AttackWindow,
    pub opponent: OpponentKind,
    pub post_rush: PostRushPhase,
    pub threat: i32,
    pub army_advantage: i32,
    pub kills: i32,
    pub all_in: bool,
    pub resources: ArrayVec<Position, { AgentConfig::MAX_REMEMBERED_RESOURCES }>,
    /// Recent hostile sightings, newest first.
    pub sightings: ArrayVec<Position, 4>,
}

impl TeamView {
    pub fn read(cache: &mut ChannelCache, io: &impl ChannelIo, now: Tick, config: &ChannelConfig) -> Self {
        let mut view = TeamView::default();
        let point = |cache: &mut ChannelCache, slot| {
            cache.fresh(io, slot, now, config).and_then(|v| v.point())
        };
        let scalar = |cache: &mut ChannelCache, slot| {
            cache.fresh(io, slot, now, config).and_then(|v| v.scalar())
        };

        view.own_leader = point(cache, Slot::OwnLeaderPos);
        view.own_leader_health = scalar(cache, Slot::OwnLeaderHealth);
        view.hostile_leader = point(cache, Slot::HostileLeaderPos);
        view.hostile_leader_health = scalar(cache, Slot::HostileLeaderHealth);
        view.focus = point(cache, Slot::FocusPos);
        view.focus_health = scalar(cache, Slot::FocusHealth);

        if view.own_leader.is_some() {
            let raw = |cache: &mut ChannelCache, slot| scalar(cache, slot).unwrap_or(0);
            view.game_state = GameState::from_raw(raw(cache, Slot::GameState)).unwrap_or_default();
            view.commitment =
                Commitment::from_raw(raw(cache, Slot::Commitment)).unwrap_or_default();
            view.window = AttackWindow::from_raw(raw(cache, Slot::AttackWindow)).unwrap_or_default();
            view.opponent =
                OpponentKind::from_raw(raw(cache, Slot::OpponentKind)).unwrap_or_default();
            view.post_rush =
                PostRushPhase::from_raw(raw(cache, Slot::PostRushPhase)).unwrap_or_default();
            view.threat = raw(cache, Slot::ThreatLevel);
            view.army_advantage = raw(cache, Slot::ArmyAdvantage);
            view.kills = raw(cache, Slot::KillCount);
            view.hostile_leader_confirmed = raw(cache, Slot::HostileLeaderConfirmed) != 0;
        }

        let all_in_stamp = cache.raw(io, Slot::AllInStamp, now, config);
        view.all_in = is_fresh(all_in_stamp, now, Staleness::AllIn.limit(config));

        for slot in Slot::RESOURCES {
            if let Some(p) = point(cache, slot) {
                view.resources.push(p);
            }
        }

        if let Some(cursor) = scalar(cache, Slot::SightingHead) {
            let (head, filled) = ring_cursor(cursor);
            let ring = Slot::SIGHTINGS.len();
            for back in 1..=filled {
                let slot = Slot::SIGHTINGS[(head + ring - back) % ring];
                if let Some(p) = point(cache, slot) {
                    view.sightings.push(p);
                }
            }
        }
        view
    }

    /// Value-function inputs built from this view.
    pub fn situation(&self) -> Situation {
        Situation {
            own_leader: self.own_leader,
            hostile_leader: self.hostile_leader,
            focus: self.focus,
            commitment: self.commitment,
            window: self.window,
            all_in: self.all_in,
            remembered_resources: self.resources.clone(),
        }
    }

    /// Best guess at the hostile leader: fresh slot first, then the newest sighting.
    pub fn hostile_leader_estimate(&self) -> Option<Position> {
        self.hostile_leader.or_else(|| self.sightings.first().copied())
    }
}
