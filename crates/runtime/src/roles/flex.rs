//! Flex agents do whatever the value function picked.
use agent_core::ObjectiveKind;

use super::{Plan, PlanInputs};

pub(super) fn plan(inputs: &PlanInputs<'_>) -> Plan {
    let objective = inputs.objective;
    Plan {
        engage: inputs.objective_target(),
        destination: objective.position,
        charge_anchor: match objective.kind {
            ObjectiveKind::HostileLeader => objective.position,
            _ => None,
        },
        ..Plan::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::TeamView;
    use crate::config::RuntimeConfig;
    use agent_core::{
        Allegiance, Entity, EntityId, EntityKind, Objective, Position, SensingSnapshot, Tick,
    };

    #[test]
    fn attack_objective_engages_the_sensed_target() {
        let mut snap =
            SensingSnapshot::new(EntityId(40), EntityKind::Ordinary, Tick(5), Position::new(5, 5));
        let enemy = Entity::new(
            EntityId(9),
            Allegiance::Hostile,
            EntityKind::Ordinary,
            Position::new(8, 5),
            60,
        );
        snap.push_entity(enemy);
        let config = RuntimeConfig::default();
        let view = TeamView::default();
        let inputs = PlanInputs {
            snapshot: &snap,
            view: &view,
            objective: Objective {
                kind: ObjectiveKind::HostileOrdinary,
                position: Some(enemy.position),
                target: Some(enemy.id),
                score: 40,
            },
            config: &config,
        };
        let plan = plan(&inputs);
        assert_eq!(plan.engage, Some(enemy));
        assert_eq!(plan.destination, Some(Position::new(8, 5)));
        assert_eq!(plan.charge_anchor, None);
    }

    #[test]
    fn leader_fallback_charges_without_a_target() {
        let snap =
            SensingSnapshot::new(EntityId(40), EntityKind::Ordinary, Tick(5), Position::new(5, 5));
        let config = RuntimeConfig::default();
        let view = TeamView::default();
        let estimate = Position::new(30, 30);
        let inputs = PlanInputs {
            snapshot: &snap,
            view: &view,
            objective: Objective {
                kind: ObjectiveKind::HostileLeader,
                position: Some(estimate),
                target: None,
                score: 50,
            },
            config: &config,
        };
        let plan = plan(&inputs);
        assert_eq!(plan.engage, None);
        assert_eq!(plan.charge_anchor, Some(estimate));
    }
}
