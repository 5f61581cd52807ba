//! Guardians hold a ring around the own leader and intercept intruders.
use agent_core::Entity;

use super::{Plan, PlanInputs, flex};

/// Threats inside the engage radius of the leader outrank everything else.
const CLOSE_THREAT_BONUS: i32 = 500;
const THREAT_BASE: i32 = 1000;

pub(super) fn plan(inputs: &PlanInputs<'_>) -> Plan {
    let Some(leader) = inputs.own_leader() else {
        return flex::plan(inputs);
    };
    let here = inputs.snapshot.position;
    let roles = &inputs.config.agent.roles;
    let (inner, outer) = roles.guardian_ring(&inputs.config.agent.profile);

    if here.distance_sq(leader) > outer {
        return Plan {
            engage: inputs.adjacent_hostile(),
            destination: Some(leader),
            ..Plan::default()
        };
    }

    let threat = inputs
        .snapshot
        .hostiles()
        .filter(|e| e.position.distance_sq(leader) <= outer * 4)
        .fold(None, |best: Option<(&Entity, i32)>, e| {
            let to_leader = e.position.distance_sq(leader);
            let mut score = THREAT_BASE - to_leader - e.health;
            if to_leader <= roles.guardian_engage_sq {
                score += CLOSE_THREAT_BONUS;
            }
            match best {
                Some((_, best_score)) if best_score >= score => best,
                _ => Some((e, score)),
            }
        });

    match threat {
        Some((enemy, _)) => Plan {
            engage: Some(*enemy),
            destination: Some(enemy.position),
            ..Plan::default()
        },
        None => Plan {
            destination: (here.distance_sq(leader) > inner).then_some(leader),
            ..Plan::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::TeamView;
    use crate::config::RuntimeConfig;
    use agent_core::{
        Allegiance, EntityId, EntityKind, Objective, Position, SensingSnapshot, Tick,
    };

    fn guardian_at(x: i32, y: i32) -> SensingSnapshot {
        SensingSnapshot::new(EntityId(102), EntityKind::Ordinary, Tick(30), Position::new(x, y))
    }

    fn run(snap: &SensingSnapshot, view: &TeamView) -> Plan {
        let config = RuntimeConfig::default();
        plan(&PlanInputs {
            snapshot: snap,
            view,
            objective: Objective::NONE,
            config: &config,
        })
    }

    fn leader_view() -> TeamView {
        TeamView {
            own_leader: Some(Position::new(10, 10)),
            ..TeamView::default()
        }
    }

    #[test]
    fn strayed_guardian_returns_to_leader() {
        let plan = run(&guardian_at(20, 20), &leader_view());
        assert_eq!(plan.destination, Some(Position::new(10, 10)));
        assert_eq!(plan.engage, None);
    }

    #[test]
    fn intruder_near_leader_beats_weaker_distant_hostile() {
        let mut snap = guardian_at(11, 11);
        let far = Entity::new(
            EntityId(8),
            Allegiance::Hostile,
            EntityKind::Ordinary,
            Position::new(14, 14),
            10,
        );
        let close = Entity::new(
            EntityId(9),
            Allegiance::Hostile,
            EntityKind::Ordinary,
            Position::new(12, 10),
            90,
        );
        snap.push_entity(far);
        snap.push_entity(close);
        let plan = run(&snap, &leader_view());
        assert_eq!(plan.engage.map(|e| e.id), Some(EntityId(9)));
    }

    #[test]
    fn quiet_guardian_settles_inside_the_ring() {
        assert_eq!(run(&guardian_at(11, 10), &leader_view()).destination, None);
        assert_eq!(
            run(&guardian_at(13, 12), &leader_view()).destination,
            Some(Position::new(10, 10))
        );
    }
}
