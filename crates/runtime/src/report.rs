//! What a follower tells its leader over the broadcast channel.
use agent_core::{AgentConfig, ChannelConfig, EntityId, Message, Position, SensingSnapshot, Tick};
use arrayvec::ArrayVec;

use crate::api::{ChannelError, ChannelIo};
use crate::channel::TeamView;
use crate::priority::ActionTaken;

/// Resources this close together are the same find.
const SAME_RESOURCE_SQ: i32 = 4;

/// Throttles follower broadcasts and remembers what was already reported.
#[derive(Clone, Debug, Default)]
pub struct Reporter {
    last_leader: Option<Tick>,
    last_resource: Option<Tick>,
    reported: ArrayVec<Position, { AgentConfig::MAX_REMEMBERED_RESOURCES }>,
    sent: u32,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcasts delivered to the host over this agent's lifetime.
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Sends this tick's reports and returns how many went out.
    ///
    /// Kills are always reported. Leader and resource sightings share the
    /// broadcast throttle, and a resource is skipped once it is on the
    /// channel or was reported before.
    pub fn report(
        &mut self,
        snapshot: &SensingSnapshot,
        view: &TeamView,
        action: Option<ActionTaken>,
        io: &mut impl ChannelIo,
        config: &ChannelConfig,
    ) -> u32 {
        let now = snapshot.tick;
        let id = snapshot.id;
        let mut sent = 0;

        if let Some(ActionTaken::Attack { killed: true, .. }) = action {
            if send(io, Message::KillConfirmed { count: 1 }, id) {
                sent += 1;
            }
        }

        if let Some(leader) = snapshot.hostile_leader() {
            if ready(self.last_leader, now, config.broadcast_throttle) {
                let message = Message::LeaderSighting {
                    position: leader.position,
                    health: leader.health,
                };
                if send(io, message, id) {
                    self.last_leader = Some(now);
                    sent += 1;
                }
            }
        }

        if ready(self.last_resource, now, config.broadcast_throttle) {
            let find = snapshot
                .resources
                .iter()
                .filter(|c| c.amount > 0)
                .map(|c| c.position)
                .find(|&p| !self.known(p, view));
            if let Some(position) = find {
                if send(io, Message::ResourceSighting { position }, id) {
                    self.last_resource = Some(now);
                    self.remember(position);
                    sent += 1;
                }
            }
        }

        self.sent = self.sent.saturating_add(sent);
        sent
    }

    fn known(&self, position: Position, view: &TeamView) -> bool {
        self.reported
            .iter()
            .chain(view.resources.iter())
            .any(|p| p.distance_sq(position) <= SAME_RESOURCE_SQ)
    }

    fn remember(&mut self, position: Position) {
        if self.reported.is_full() {
            self.reported.remove(0);
        }
        self.reported.push(position);
    }
}

fn ready(last: Option<Tick>, now: Tick, throttle: u32) -> bool {
    last.is_none_or(|at| now.since(at) >= throttle)
}

fn send(io: &mut impl ChannelIo, message: Message, id: EntityId) -> bool {
    let result = message
        .encode()
        .map_err(ChannelError::from)
        .and_then(|bits| io.broadcast(bits));
    match result {
        Ok(()) => {
            tracing::trace!("{} broadcast {:?}", id, message);
            true
        }
        Err(err) => {
            tracing::warn!("{} broadcast {:?} failed: {}", id, message, err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MessageBatch;
    use agent_core::{Allegiance, Entity, EntityKind, ResourceCell};

    #[derive(Default)]
    struct Radio {
        sent: Vec<u32>,
        drop_all: bool,
    }

    impl ChannelIo for Radio {
        fn read_slot(&self, _: usize) -> u16 {
            0
        }

        fn write_slot(&mut self, index: usize, _: u16) -> Result<(), ChannelError> {
            Err(ChannelError::NotWriter { index })
        }

        fn broadcast(&mut self, bits: u32) -> Result<(), ChannelError> {
            if self.drop_all {
                return Err(ChannelError::BroadcastDropped { bits });
            }
            self.sent.push(bits);
            Ok(())
        }

        fn receive_recent(&self, _: usize) -> MessageBatch {
            MessageBatch::new()
        }
    }

    fn scout(tick: u32) -> SensingSnapshot {
        let mut snap =
            SensingSnapshot::new(EntityId(81), EntityKind::Ordinary, Tick(tick), Position::new(5, 5));
        snap.push_entity(Entity::new(
            EntityId(500),
            Allegiance::Hostile,
            EntityKind::Leader,
            Position::new(9, 7),
            640,
        ));
        snap.push_resource(ResourceCell {
            position: Position::new(4, 6),
            amount: 20,
        });
        snap
    }

    fn decoded(radio: &Radio) -> Vec<Message> {
        radio.sent.iter().filter_map(|&bits| Message::decode(bits)).collect()
    }

    #[test]
    fn sightings_are_throttled() {
        let config = ChannelConfig::default();
        let view = TeamView::default();
        let mut radio = Radio::default();
        let mut reporter = Reporter::new();

        assert_eq!(reporter.report(&scout(1), &view, None, &mut radio, &config), 2);
        assert_eq!(reporter.report(&scout(5), &view, None, &mut radio, &config), 0);
        // Resource already reported; only the leader sighting goes out again.
        assert_eq!(reporter.report(&scout(11), &view, None, &mut radio, &config), 1);
        assert!(matches!(
            decoded(&radio)[..],
            [
                Message::LeaderSighting { .. },
                Message::ResourceSighting { .. },
                Message::LeaderSighting { .. }
            ]
        ));
        assert_eq!(reporter.sent(), 3);
    }

    #[test]
    fn resources_on_the_channel_are_not_reported() {
        let view = TeamView {
            resources: [Position::new(5, 6)].into_iter().collect(),
            ..TeamView::default()
        };
        let mut snap = SensingSnapshot::new(EntityId(81), EntityKind::Ordinary, Tick(1), Position::new(5, 5));
        snap.push_resource(ResourceCell {
            position: Position::new(4, 6),
            amount: 20,
        });
        let mut radio = Radio::default();
        let sent = Reporter::new().report(&snap, &view, None, &mut radio, &ChannelConfig::default());
        assert_eq!(sent, 0);
    }

    #[test]
    fn kills_bypass_the_throttle_and_drops_are_not_counted() {
        let config = ChannelConfig::default();
        let view = TeamView::default();
        let kill = Some(ActionTaken::Attack {
            target: EntityId(7),
            killed: true,
        });
        let snap = SensingSnapshot::new(EntityId(90), EntityKind::Ordinary, Tick(3), Position::new(5, 5));

        let mut radio = Radio::default();
        let mut reporter = Reporter::new();
        assert_eq!(reporter.report(&snap, &view, kill, &mut radio, &config), 1);
        assert_eq!(decoded(&radio), vec![Message::KillConfirmed { count: 1 }]);

        let mut dead_air = Radio {
            drop_all: true,
            ..Radio::default()
        };
        assert_eq!(reporter.report(&scout(4), &view, kill, &mut dead_air, &config), 0);
        assert_eq!(reporter.sent(), 1);
    }
}
