use arrayvec::ArrayVec;

use crate::config::{AgentConfig, ValueConfig};
use crate::grid::Position;
use crate::sensing::{Entity, EntityId, SensingSnapshot};
use crate::strategy::{AttackWindow, Commitment};

use super::ObjectiveKind;

/// A scored-to-be objective with its modifiers resolved.
///
/// Final score is `(decayed(base) + bonus) * scale_32 / 32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub kind: ObjectiveKind,
    pub position: Position,
    pub target: Option<EntityId>,
    pub distance_sq: i32,
    /// Value before weighting and distance decay.
    pub base: i32,
    /// Flat adjustment added after distance decay.
    pub bonus: i32,
    /// Post-bonus multiplier in 1/32 units; 32 leaves the score unchanged.
    pub scale_32: i32,
}

impl Candidate {
    pub const fn new(kind: ObjectiveKind, position: Position, distance_sq: i32, base: i32) -> Self {
        Self {
            kind,
            position,
            target: None,
            distance_sq,
            base,
            bonus: 0,
            scale_32: 32,
        }
    }

    #[must_use]
    pub const fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub const fn with_bonus(mut self, bonus: i32) -> Self {
        self.bonus = bonus;
        self
    }

    #[must_use]
    pub const fn with_scale(mut self, scale_32: i32) -> Self {
        self.scale_32 = scale_32;
        self
    }
}

pub type CandidateList = ArrayVec<Candidate, { AgentConfig::MAX_CANDIDATES }>;

/// Team knowledge the modifiers depend on, mostly read from the channel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Situation {
    pub own_leader: Option<Position>,
    pub hostile_leader: Option<Position>,
    pub focus: Option<Position>,
    pub commitment: Commitment,
    pub window: AttackWindow,
    /// All-in stamp is fresh.
    pub all_in: bool,
    pub remembered_resources: ArrayVec<Position, { AgentConfig::MAX_REMEMBERED_RESOURCES }>,
}

impl Situation {
    #[inline]
    pub fn all_in_mode(&self) -> bool {
        self.all_in || self.commitment == Commitment::AllIn
    }
}

// All-in halves delivery and cuts ordinary hostiles to 11/32.
const ALL_IN_DELIVERY_SCALE: i32 = 16;
const ALL_IN_ORDINARY_SCALE: i32 = 11;

/// Builds every candidate for this tick with situational modifiers applied.
///
/// Delivery only exists while carrying with a known leader; resources are
/// skipped while carrying or in all-in mode. Hazards are never candidates.
pub fn gather_candidates(
    snapshot: &SensingSnapshot,
    situation: &Situation,
    config: &ValueConfig,
) -> CandidateList {
    let mut out = CandidateList::new();
    let here = snapshot.position;
    let all_in = situation.all_in_mode();

    if snapshot.is_carrying() && !snapshot.is_leader() {
        if let Some(leader) = situation.own_leader {
            let delivery = Candidate::new(
                ObjectiveKind::Delivery,
                leader,
                here.distance_sq(leader),
                config.delivery_base,
            );
            let delivery = if all_in {
                delivery.with_scale(ALL_IN_DELIVERY_SCALE)
            } else {
                delivery
            };
            let _ = out.try_push(delivery);
        }
    }

    for hostile in snapshot.hostiles() {
        let candidate = hostile_candidate(hostile, snapshot, situation, config, all_in);
        if out.try_push(candidate).is_err() {
            break;
        }
    }

    if !snapshot.is_carrying() && !all_in {
        let base = resource_base(snapshot.team_reserve, config);
        let sensed = snapshot.resources.iter().map(|cell| cell.position);
        let remembered = situation
            .remembered_resources
            .iter()
            .copied()
            .filter(|p| !snapshot.resources.iter().any(|cell| cell.position == *p));
        for position in sensed.chain(remembered) {
            let candidate =
                Candidate::new(ObjectiveKind::Resource, position, here.distance_sq(position), base);
            if out.try_push(candidate).is_err() {
                break;
            }
        }
    }

    out
}

fn hostile_candidate(
    hostile: &Entity,
    snapshot: &SensingSnapshot,
    situation: &Situation,
    config: &ValueConfig,
    all_in: bool,
) -> Candidate {
    let distance_sq = snapshot.position.distance_sq(hostile.position);
    let (kind, mut base) = if hostile.is_leader() {
        (ObjectiveKind::HostileLeader, config.hostile_leader_base)
    } else {
        (ObjectiveKind::HostileOrdinary, config.hostile_ordinary_base)
    };

    if hostile.is_leader() {
        if hostile.health < config.wounded_leader_health {
            base += config.wounded_leader_bonus;
        }
        if situation.window.targets_leader() {
            base += config.window_leader_bonus;
        }
    }

    let mut bonus = 0;
    if situation
        .focus
        .is_some_and(|focus| hostile.position.distance_sq(focus) <= config.focus_fire_radius_sq)
    {
        bonus += config.focus_fire_bonus;
    }
    if !snapshot.is_carrying() {
        bonus += commitment_bonus(hostile, situation, config);
    }
    if situation
        .own_leader
        .is_some_and(|leader| hostile.position.distance_sq(leader) <= config.home_territory_radius_sq)
    {
        bonus += config.home_territory_bonus;
    }
    if is_overkill(hostile, snapshot, config) {
        bonus -= config.overkill_penalty;
    }

    let mut scale_32 = 32;
    if all_in {
        if hostile.is_leader() {
            bonus += config.all_in_leader_bonus;
        } else {
            scale_32 = ALL_IN_ORDINARY_SCALE;
        }
    }

    Candidate::new(kind, hostile.position, distance_sq, base)
        .with_target(hostile.id)
        .with_bonus(bonus)
        .with_scale(scale_32)
}

/// Commitment-specific target preferences.
fn commitment_bonus(hostile: &Entity, situation: &Situation, config: &ValueConfig) -> i32 {
    let near = |anchor: Option<Position>| {
        anchor.is_some_and(|p| hostile.position.distance_sq(p) <= config.leader_vicinity_sq)
    };
    let leader = hostile.is_leader();
    let mut bonus = 0;
    match situation.commitment {
        Commitment::Raid => {
            if hostile.is_carrying() {
                bonus += config.raid_carrier_bonus;
            }
            if near(situation.hostile_leader) {
                bonus += config.raid_escort_bonus;
            }
            if hostile.health < config.raid_weak_health {
                bonus += config.raid_weak_bonus;
            }
            if leader {
                bonus -= config.raid_leader_penalty;
            }
        }
        Commitment::Assault | Commitment::AllIn => {
            if leader {
                bonus += config.assault_leader_bonus;
            } else if near(situation.hostile_leader) {
                bonus += config.assault_blocker_bonus;
            }
        }
        Commitment::Defend => {
            if near(situation.own_leader) {
                bonus += config.defend_intruder_bonus;
            }
            if hostile.is_carrying() {
                bonus += config.defend_carrier_bonus;
            }
        }
        Commitment::Probe => bonus -= config.probe_penalty,
    }
    bonus
}

/// Near-dead target that adjacent teammates will finish anyway.
fn is_overkill(hostile: &Entity, snapshot: &SensingSnapshot, config: &ValueConfig) -> bool {
    if hostile.health > config.overkill_health {
        return false;
    }
    let allies = snapshot.allies_adjacent_to(hostile.position);
    allies > 0 && allies * config.overkill_damage_per_ally >= hostile.health
}

fn resource_base(reserve: i32, config: &ValueConfig) -> i32 {
    if reserve < config.critical_reserve {
        config.resource_critical_base
    } else if reserve < config.low_reserve {
        config.resource_low_base
    } else {
        config.resource_base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensing::{Allegiance, EntityKind, ResourceCell, Tick};

    fn snapshot() -> SensingSnapshot {
        let mut snap =
            SensingSnapshot::new(EntityId(42), EntityKind::Ordinary, Tick(90), Position::new(10, 10));
        snap.team_reserve = 1000;
        snap
    }

    fn hostile(id: u32, kind: EntityKind, x: i32, y: i32, health: i32) -> Entity {
        Entity::new(EntityId(id), Allegiance::Hostile, kind, Position::new(x, y), health)
    }

    #[test]
    fn carrying_agent_gets_delivery_and_no_resources() {
        let mut snap = snapshot();
        snap.carried = 20;
        snap.push_resource(ResourceCell {
            position: Position::new(11, 10),
            amount: 5,
        });
        let situation = Situation {
            own_leader: Some(Position::new(4, 4)),
            ..Situation::default()
        };
        let list = gather_candidates(&snap, &situation, &ValueConfig::default());
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].kind, ObjectiveKind::Delivery);
        assert_eq!(list[0].distance_sq, 72);
    }

    #[test]
    fn all_in_adjusts_hostiles_and_drops_resources() {
        let mut snap = snapshot();
        snap.push_entity(hostile(1, EntityKind::Leader, 12, 10, 400));
        snap.push_entity(hostile(2, EntityKind::Ordinary, 9, 10, 100));
        snap.push_resource(ResourceCell {
            position: Position::new(11, 11),
            amount: 5,
        });
        let situation = Situation {
            all_in: true,
            commitment: Commitment::Raid,
            ..Situation::default()
        };
        let config = ValueConfig::default();
        let list = gather_candidates(&snap, &situation, &config);
        assert_eq!(list.len(), 2);
        let leader = list.iter().find(|c| c.kind == ObjectiveKind::HostileLeader).unwrap();
        assert_eq!(leader.bonus, config.all_in_leader_bonus - config.raid_leader_penalty);
        let ordinary = list.iter().find(|c| c.kind == ObjectiveKind::HostileOrdinary).unwrap();
        assert_eq!(ordinary.scale_32, 11);
    }

    #[test]
    fn wounded_leader_and_window_raise_base() {
        let mut snap = snapshot();
        snap.push_entity(hostile(1, EntityKind::Leader, 15, 10, 200));
        let situation = Situation {
            window: AttackWindow::WoundedLeader,
            ..Situation::default()
        };
        let config = ValueConfig::default();
        let list = gather_candidates(&snap, &situation, &config);
        assert_eq!(
            list[0].base,
            config.hostile_leader_base + config.wounded_leader_bonus + config.window_leader_bonus
        );
        assert_eq!(list[0].target, Some(EntityId(1)));
    }

    #[test]
    fn focus_home_and_defend_bonuses_stack() {
        let mut snap = snapshot();
        snap.push_entity(hostile(3, EntityKind::Ordinary, 6, 6, 100));
        let situation = Situation {
            own_leader: Some(Position::new(5, 5)),
            focus: Some(Position::new(6, 7)),
            commitment: Commitment::Defend,
            ..Situation::default()
        };
        let config = ValueConfig::default();
        let list = gather_candidates(&snap, &situation, &config);
        assert_eq!(
            list[0].bonus,
            config.focus_fire_bonus + config.defend_intruder_bonus + config.home_territory_bonus
        );
    }

    #[test]
    fn overkill_penalises_targets_allies_will_finish() {
        let mut snap = snapshot();
        snap.push_entity(hostile(4, EntityKind::Ordinary, 20, 20, 15));
        snap.push_entity(Entity::new(
            EntityId(5),
            Allegiance::Ally,
            EntityKind::Ordinary,
            Position::new(21, 20),
            100,
        ));
        snap.push_entity(Entity::new(
            EntityId(6),
            Allegiance::Ally,
            EntityKind::Ordinary,
            Position::new(19, 21),
            100,
        ));
        let situation = Situation {
            commitment: Commitment::Assault,
            ..Situation::default()
        };
        let config = ValueConfig::default();
        let list = gather_candidates(&snap, &situation, &config);
        assert_eq!(list[0].bonus, -config.overkill_penalty);
    }

    #[test]
    fn low_reserve_raises_resource_value_and_memory_is_deduplicated() {
        let mut snap = snapshot();
        snap.team_reserve = 100;
        snap.push_resource(ResourceCell {
            position: Position::new(12, 12),
            amount: 3,
        });
        let mut situation = Situation::default();
        situation.remembered_resources.push(Position::new(12, 12));
        situation.remembered_resources.push(Position::new(30, 2));
        let config = ValueConfig::default();
        let list = gather_candidates(&snap, &situation, &config);
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|c| c.base == config.resource_critical_base));
    }

    #[test]
    fn hazards_are_never_candidates() {
        let mut snap = snapshot();
        snap.push_entity(Entity::new(
            EntityId(9),
            Allegiance::Hazard,
            EntityKind::Hazard,
            Position::new(11, 11),
            500,
        ));
        let list = gather_candidates(&snap, &Situation::default(), &ValueConfig::default());
        assert!(list.is_empty());
    }
}
