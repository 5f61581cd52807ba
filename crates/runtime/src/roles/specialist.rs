//! Specialist sub-roles: scouts find the hostile leader, raiders hit the
//! hostile economy, assassins go for the leader itself.
use agent_core::{Direction, Position};

use super::{Plan, PlanInputs, Specialty, nearest};

/// Squared reach at which a specialist commits to a nearby hostile.
const STRIKE_SQ: i32 = 9;
/// Raiders take fights of opportunity only against this many hostiles or fewer.
const OPPORTUNITY_LIMIT: usize = 2;
/// Scouts pick a new spiral heading every this many ticks.
const SPIRAL_PERIOD: u32 = 5;

pub(super) fn plan(inputs: &PlanInputs<'_>) -> Plan {
    let snap = inputs.snapshot;
    let mut specialty =
        Specialty::choose(snap.id, inputs.view, snap.tick.get(), &inputs.config.agent.roles);
    if specialty == Specialty::Scout && snap.hostile_leader().is_some() {
        specialty = Specialty::Assassin;
    }
    let plan = match specialty {
        Specialty::Assassin => assassin(inputs),
        Specialty::Raider => raider(inputs),
        Specialty::Scout => scout(inputs),
    };
    Plan {
        specialty: Some(specialty),
        ..plan
    }
}

fn assassin(inputs: &PlanInputs<'_>) -> Plan {
    let snap = inputs.snapshot;
    let here = snap.position;
    if let Some(leader) = snap.hostile_leader() {
        if here.distance_sq(leader.position) <= STRIKE_SQ {
            return Plan {
                engage: Some(*leader),
                destination: Some(leader.position),
                charge_anchor: Some(leader.position),
                ..Plan::default()
            };
        }
    }

    let estimate = snap
        .hostile_leader()
        .map(|e| e.position)
        .or_else(|| inputs.view.hostile_leader_estimate());
    let Some(target) = estimate else {
        return scout(inputs);
    };

    // Close to the leader only blockers are worth a swing.
    let engage = if here.distance_sq(target) <= inputs.config.agent.roles.assassin_bypass_sq {
        inputs.adjacent_hostile()
    } else {
        inputs
            .objective_target()
            .filter(|e| e.position.distance_sq(here) <= STRIKE_SQ)
    };
    Plan {
        engage,
        destination: Some(target),
        charge_anchor: Some(target),
        ..Plan::default()
    }
}

fn raider(inputs: &PlanInputs<'_>) -> Plan {
    let snap = inputs.snapshot;
    let near_resource = |p: Position| {
        snap.resources
            .iter()
            .map(|r| r.position)
            .chain(inputs.view.resources.iter().copied())
            .any(|r| r.distance_sq(p) <= STRIKE_SQ)
    };

    let prey = nearest(snap, |e| e.is_hostile() && e.is_carrying())
        .or_else(|| nearest(snap, |e| e.is_hostile() && near_resource(e.position)))
        .or_else(|| {
            if snap.hostiles().count() <= OPPORTUNITY_LIMIT {
                nearest(snap, |e| e.is_hostile())
            } else {
                None
            }
        });
    if let Some(prey) = prey {
        return Plan {
            engage: Some(prey),
            destination: Some(prey.position),
            ..Plan::default()
        };
    }

    let center = inputs.config.arena.center();
    let destination = match inputs.view.hostile_leader_estimate() {
        Some(leader) => Position::new((leader.x + center.x) / 2, (leader.y + center.y) / 2),
        None => center,
    };
    Plan {
        destination: Some(destination),
        ..Plan::default()
    }
}

fn scout(inputs: &PlanInputs<'_>) -> Plan {
    let snap = inputs.snapshot;
    let roles = &inputs.config.agent.roles;
    let arena = &inputs.config.arena;
    let destination = match inputs.view.hostile_leader_estimate() {
        Some(estimate) if snap.position.distance_sq(estimate) <= roles.scout_spiral_sq => {
            let heading = Direction::from_ordinal(((snap.tick.get() / SPIRAL_PERIOD) % 8) as usize);
            let (dx, dy) = heading.offset();
            arena.clamp(Position::new(
                estimate.x + dx * roles.scout_spiral_offset,
                estimate.y + dy * roles.scout_spiral_offset,
            ))
        }
        Some(estimate) => estimate,
        None => arena.quadrant(snap.id.get()),
    };
    Plan {
        engage: inputs.adjacent_hostile(),
        destination: Some(destination),
        ..Plan::default()
    }
}
