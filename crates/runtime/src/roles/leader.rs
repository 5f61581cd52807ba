//! Leader duties.
//!
//! The leader is the only writer on the shared channel. Each tick it folds
//! team broadcasts and its own sensing into team aggregates, runs the
//! strategy controller, picks a focus-fire target and publishes everything
//! through the rate-limited [`SlotWriter`].
use agent_core::{
    AgentConfig, AttackWindow, Commitment, Entity, GameState, Message, Position, SensingSnapshot,
    Slot, SlotValue, StrategyController, StrategyUpdate, TeamAggregates, Tick, age_of, decode,
};
use arrayvec::ArrayVec;

use super::{Plan, PlanInputs, nearest};
use crate::api::{ChannelError, ChannelIo};
use crate::channel::{SlotWriter, TeamView, sighting_cursor};
use crate::config::RuntimeConfig;

/// Two reports closer than this are the same place.
const SAME_PLACE_SQ: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Sighting {
    position: Position,
    health: i32,
    seen_at: Tick,
}

/// What fresh information arrived this tick.
#[derive(Clone, Copy, Debug, Default)]
struct Fresh {
    hostile_leader: bool,
    sighting: bool,
    resource: bool,
}

/// Outcome of one leader tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LeaderReport {
    pub update: StrategyUpdate,
    pub focus: Option<Entity>,
    /// Broadcast words decoded this tick.
    pub messages: usize,
    /// Channel writes the host rejected.
    pub rejected_writes: u32,
}

/// Leader-only state; created the first tick an agent acts as leader.
#[derive(Clone, Debug, Default)]
pub struct LeaderState {
    writer: SlotWriter,
    restored: bool,
    kills: i32,
    confirmed: bool,
    hostile_leader: Option<Sighting>,
    last_sighting: Option<Position>,
    sightings_written: u32,
    resources: ArrayVec<Position, { AgentConfig::MAX_REMEMBERED_RESOURCES }>,
    resource_next: usize,
    threat: i32,
    army_advantage: i32,
}

impl LeaderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kills(&self) -> i32 {
        self.kills
    }

    pub fn writes(&self) -> u32 {
        self.writer.writes()
    }

    /// Counts a kill made by the leader itself.
    pub fn record_kill(&mut self) {
        self.kills = self.kills.saturating_add(1);
    }

    /// Runs the leader duty for one tick.
    pub fn run(
        &mut self,
        snapshot: &SensingSnapshot,
        strategy: &mut StrategyController,
        io: &mut impl ChannelIo,
        config: &RuntimeConfig,
    ) -> LeaderReport {
        let now = snapshot.tick;
        if !self.restored {
            self.restore(strategy, &*io, now);
        }

        let mut fresh = Fresh::default();
        if let Some(leader) = snapshot.hostile_leader() {
            self.note_hostile_leader(leader.position, leader.health, now, &mut fresh);
        }
        if let Some(cell) = snapshot.resources.iter().find(|c| c.amount > 0) {
            self.note_resource(cell.position, &mut fresh);
        }
        let messages = self.fold_messages(&*io, now, &mut fresh);

        let aggregates = self.aggregates(snapshot, config);
        let update = strategy.update(&aggregates, &config.agent);
        log_transitions(&update, now);

        let focus = snapshot
            .hostiles()
            .min_by_key(|e| (!e.is_leader(), e.health))
            .copied();
        let rejected_writes = self.publish(snapshot, strategy, &update, focus, fresh, io, config);

        LeaderReport {
            update,
            focus,
            messages,
            rejected_writes,
        }
    }

    /// Team view as the leader knows it, without reading the channel back.
    pub fn view(
        &self,
        snapshot: &SensingSnapshot,
        strategy: &StrategyController,
        config: &RuntimeConfig,
    ) -> TeamView {
        let sighting = self.live_sighting(snapshot.tick, config);
        TeamView {
            own_leader: Some(snapshot.position),
            own_leader_health: Some(snapshot.health),
            hostile_leader: sighting.map(|s| s.position),
            hostile_leader_health: sighting.map(|s| s.health),
            hostile_leader_confirmed: self.confirmed,
            game_state: strategy.game_state(),
            commitment: strategy.commitment(),
            window: strategy.window(),
            opponent: strategy.classifier().kind(),
            post_rush: strategy.post_rush(),
            threat: self.threat,
            army_advantage: self.army_advantage,
            kills: self.kills,
            all_in: strategy.commitment() == Commitment::AllIn,
            resources: self.resources.clone(),
            ..TeamView::default()
        }
    }

    /// Picks up where an earlier leader instance left off.
    fn restore(&mut self, strategy: &mut StrategyController, io: &impl ChannelIo, now: Tick) {
        let read = |slot: Slot| decode(io.read_slot(slot.index()), slot.format());
        let stamped_at = |slot: Slot| {
            read(slot)
                .stamp()
                .and_then(|stamp| age_of(stamp, now))
                .map(|age| Tick(now.get().saturating_sub(age)))
        };

        strategy.restore_rush_survived(stamped_at(Slot::RushSurvivedStamp));
        if stamped_at(Slot::OwnLeaderStamp).is_some() {
            let raw = |slot: Slot| read(slot).scalar().unwrap_or(0);
            strategy.adopt(
                GameState::from_raw(raw(Slot::GameState)).unwrap_or_default(),
                Commitment::from_raw(raw(Slot::Commitment)).unwrap_or_default(),
                AttackWindow::from_raw(raw(Slot::AttackWindow)).unwrap_or_default(),
            );
            self.kills = raw(Slot::KillCount);
            self.confirmed = raw(Slot::HostileLeaderConfirmed) != 0;
            tracing::debug!(
                "leader restored from channel: {} kills, commitment {}",
                self.kills,
                strategy.commitment()
            );
        }
        self.restored = true;
    }

    fn note_hostile_leader(&mut self, position: Position, health: i32, now: Tick, fresh: &mut Fresh) {
        self.confirmed = true;
        self.hostile_leader = Some(Sighting {
            position,
            health,
            seen_at: now,
        });
        fresh.hostile_leader = true;

        let moved = self
            .last_sighting
            .is_none_or(|last| last.distance_sq(position) > SAME_PLACE_SQ);
        if moved {
            self.last_sighting = Some(position);
            fresh.sighting = true;
        }
    }

    fn note_resource(&mut self, position: Position, fresh: &mut Fresh) {
        if self
            .resources
            .iter()
            .any(|known| known.distance_sq(position) <= SAME_PLACE_SQ)
        {
            return;
        }
        if self.resources.is_full() {
            self.resources[self.resource_next] = position;
        } else {
            self.resources.push(position);
        }
        self.resource_next = (self.resource_next + 1) % self.resources.capacity();
        fresh.resource = true;
    }

    fn fold_messages(&mut self, io: &impl ChannelIo, now: Tick, fresh: &mut Fresh) -> usize {
        let mut decoded = 0;
        for bits in io.receive_recent(AgentConfig::MAX_MESSAGES) {
            match Message::decode(bits) {
                Some(Message::LeaderSighting { position, health }) => {
                    self.note_hostile_leader(position, health, now, fresh);
                }
                Some(Message::ResourceSighting { position }) => self.note_resource(position, fresh),
                Some(Message::KillConfirmed { count }) => {
                    self.kills = self.kills.saturating_add(count.min(i32::MAX as u32) as i32);
                }
                None => {
                    tracing::trace!("dropping undecodable broadcast {:#010x}", bits);
                    continue;
                }
            }
            decoded += 1;
        }
        decoded
    }

    fn live_sighting(&self, now: Tick, config: &RuntimeConfig) -> Option<Sighting> {
        let limit = config.agent.channel.sighting_stale_ticks as u32;
        self.hostile_leader.filter(|s| now.since(s.seen_at) <= limit)
    }

    fn aggregates(&mut self, snapshot: &SensingSnapshot, config: &RuntimeConfig) -> TeamAggregates {
        let ordinary = |e: &&Entity| !e.is_leader();
        let hostiles = snapshot.hostiles().filter(ordinary).count() as i32;
        let allies = snapshot.allies().filter(ordinary).count() as i32;
        self.threat = snapshot.hostiles().count() as i32;
        self.army_advantage = allies - hostiles;
        TeamAggregates {
            tick: snapshot.tick,
            leader_health: snapshot.health,
            team_reserve: snapshot.team_reserve,
            threat: self.threat,
            hostiles_near_leader: snapshot
                .hostiles_within(snapshot.position, config.agent.roles.leader_threat_radius_sq),
            army_advantage: self.army_advantage,
            hostile_leader_health: self.live_sighting(snapshot.tick, config).map(|s| s.health),
            hostile_leader_confirmed: self.confirmed,
            kills: self.kills,
        }
    }

    /// Writes every slot the leader owns. Returns the number of rejected writes.
    #[allow(clippy::too_many_arguments)]
    fn publish(
        &mut self,
        snapshot: &SensingSnapshot,
        strategy: &StrategyController,
        update: &StrategyUpdate,
        focus: Option<Entity>,
        fresh: Fresh,
        io: &mut impl ChannelIo,
        config: &RuntimeConfig,
    ) -> u32 {
        let now = snapshot.tick;
        let channel = &config.agent.channel;
        let writer = &mut self.writer;
        let mut rejected = 0;
        let mut check = |slot: Slot, result: Result<bool, ChannelError>| {
            if let Err(err) = result {
                tracing::warn!("leader write to {} rejected: {}", slot, err);
                rejected += 1;
            }
        };

        let classifier = strategy.classifier();
        let values = [
            (Slot::OwnLeaderPos, SlotValue::Point(snapshot.position)),
            (Slot::OwnLeaderHealth, SlotValue::Scalar(snapshot.health)),
            (Slot::AttackWindow, SlotValue::Scalar(strategy.window().as_raw())),
            (Slot::OpponentKind, SlotValue::Scalar(classifier.kind().as_raw())),
            (Slot::PostRushPhase, SlotValue::Scalar(strategy.post_rush().as_raw())),
            (Slot::ThreatLevel, SlotValue::Scalar(self.threat)),
            (Slot::ArmyAdvantage, SlotValue::Scalar(self.army_advantage)),
            (Slot::KillCount, SlotValue::Scalar(self.kills)),
            (Slot::HostilesNearLeader, SlotValue::Scalar(classifier.near_leader_total())),
            (Slot::HostilesSeen, SlotValue::Scalar(classifier.seen_total())),
            (Slot::HostileLeaderConfirmed, SlotValue::Scalar(self.confirmed as i32)),
        ];
        for (slot, value) in values {
            check(slot, writer.publish(io, slot, value, now, channel));
        }
        // No heartbeat for game state and commitment.
        let strategy_values = [
            (Slot::GameState, SlotValue::Scalar(strategy.game_state().as_raw())),
            (Slot::Commitment, SlotValue::Scalar(strategy.commitment().as_raw())),
        ];
        for (slot, value) in strategy_values {
            check(slot, writer.publish_on_change(io, slot, value, now));
        }
        check(
            Slot::OwnLeaderStamp,
            writer.stamp(io, Slot::OwnLeaderStamp, false, now, channel),
        );

        if let (true, Some(sighting)) = (fresh.hostile_leader, self.hostile_leader) {
            check(
                Slot::HostileLeaderPos,
                writer.publish(io, Slot::HostileLeaderPos, SlotValue::Point(sighting.position), now, channel),
            );
            check(
                Slot::HostileLeaderHealth,
                writer.publish(io, Slot::HostileLeaderHealth, SlotValue::Scalar(sighting.health), now, channel),
            );
            check(
                Slot::HostileLeaderStamp,
                writer.stamp(io, Slot::HostileLeaderStamp, true, now, channel),
            );
        }

        if let (true, Some(position)) = (fresh.sighting, self.last_sighting) {
            let ring = Slot::SIGHTINGS.len() as u32;
            let slot = Slot::SIGHTINGS[(self.sightings_written % ring) as usize];
            check(slot, writer.publish(io, slot, SlotValue::Point(position), now, channel));
            self.sightings_written = self.sightings_written.saturating_add(1);
            check(
                Slot::SightingHead,
                writer.publish(
                    io,
                    Slot::SightingHead,
                    SlotValue::Scalar(sighting_cursor(self.sightings_written)),
                    now,
                    channel,
                ),
            );
            check(
                Slot::SightingStamp,
                writer.stamp(io, Slot::SightingStamp, true, now, channel),
            );
        }

        if fresh.resource {
            for (slot, position) in Slot::RESOURCES.into_iter().zip(self.resources.iter()) {
                check(slot, writer.publish(io, slot, SlotValue::Point(*position), now, channel));
            }
            check(
                Slot::ResourceStamp,
                writer.stamp(io, Slot::ResourceStamp, true, now, channel),
            );
        }

        match focus {
            Some(target) => {
                check(
                    Slot::FocusPos,
                    writer.publish(io, Slot::FocusPos, SlotValue::Point(target.position), now, channel),
                );
                check(
                    Slot::FocusHealth,
                    writer.publish(io, Slot::FocusHealth, SlotValue::Scalar(target.health), now, channel),
                );
                check(Slot::FocusStamp, writer.stamp(io, Slot::FocusStamp, true, now, channel));
            }
            None => check(Slot::FocusStamp, writer.clear_stamp(io, Slot::FocusStamp, now)),
        }

        if update.all_in_started {
            check(Slot::AllInStamp, writer.stamp(io, Slot::AllInStamp, true, now, channel));
        }
        if update.rush_survived.is_some() {
            check(
                Slot::RushSurvivedStamp,
                writer.stamp(io, Slot::RushSurvivedStamp, true, now, channel),
            );
        }
        rejected
    }
}

fn log_transitions(update: &StrategyUpdate, now: Tick) {
    if let Some(state) = update.game_state {
        tracing::info!("{}: game state -> {}", now, state);
    }
    if let Some(commitment) = update.commitment {
        tracing::info!("{}: commitment -> {}", now, commitment);
    }
    if let Some(window) = update.window {
        tracing::info!("{}: attack window -> {}", now, window);
    }
    if let Some(opponent) = update.opponent {
        tracing::info!("{}: opponent classified as {}", now, opponent);
    }
    if let Some(phase) = update.post_rush {
        tracing::info!("{}: post-rush phase -> {}", now, phase);
    }
    if update.all_in_started {
        tracing::info!("{}: all-in", now);
    }
}

/// Leaders only fight what is already on top of them and otherwise step
/// away from the closest threat.
pub(super) fn plan(inputs: &PlanInputs<'_>) -> Plan {
    let engage = inputs.adjacent_hostile();
    let snap = inputs.snapshot;
    let radius = inputs.config.agent.roles.leader_threat_radius_sq;
    let flee_from = match engage {
        Some(_) => None,
        None => nearest(snap, |e| {
            e.is_hostile() && e.position.distance_sq(snap.position) <= radius
        })
        .map(|e| e.position),
    };
    Plan {
        engage,
        flee_from,
        ..Plan::default()
    }
}
