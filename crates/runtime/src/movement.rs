//! Turning a plan into at most one step per tick.
use agent_core::{
    Allegiance, BugNavigator, Direction, Entity, EntityKind, NavConfig, Position, SensingSnapshot,
    flee_step,
};

use crate::api::Actuator;
use crate::roles::Plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    Hold,
    /// Navigate toward a point with the bug navigator.
    Toward(Position),
    /// Take exactly this step.
    Step(Direction),
    /// Step directly away from a threat.
    Flee(Position),
}

/// Picks this tick's movement.
///
/// A nearby hazard outranks everything, then the plan's flee request, then
/// whatever the kiting machine asked for, then the plan's destination.
pub fn resolve(
    snapshot: &SensingSnapshot,
    plan: &Plan,
    kite_intent: Option<MoveIntent>,
    config: &NavConfig,
) -> MoveIntent {
    if let Some(hazard) = nearest_hazard(snapshot, config.hazard_flee_radius_sq) {
        return MoveIntent::Flee(hazard.position);
    }
    if let Some(threat) = plan.flee_from {
        return MoveIntent::Flee(threat);
    }
    if let Some(intent) = kite_intent {
        return intent;
    }
    plan.destination.map_or(MoveIntent::Hold, MoveIntent::Toward)
}

/// Executes `intent`; returns the direction actually moved.
///
/// A rejected move resets the navigator, which assumes every step it
/// returns was taken.
pub fn execute(
    navigator: &mut BugNavigator,
    snapshot: &SensingSnapshot,
    intent: MoveIntent,
    anchor: Option<Position>,
    actuator: &mut dyn Actuator,
    config: &NavConfig,
) -> Option<Direction> {
    if !snapshot.movement_ready {
        return None;
    }
    let here = snapshot.position;
    let dir = match intent {
        MoveIntent::Hold => return None,
        MoveIntent::Step(dir) => dir,
        MoveIntent::Flee(threat) => {
            flee_step(here, threat, snapshot.hazards, |d| actuator.can_move(d))
        }
        MoveIntent::Toward(to) => {
            navigator.set_charge_anchor(anchor);
            navigator.step(here, to, snapshot.hazards, config, |d| actuator.can_move(d))
        }
    };
    if dir.is_center() || !actuator.can_move(dir) {
        return None;
    }
    match actuator.try_move(dir) {
        Ok(()) => Some(dir),
        Err(err) => {
            tracing::warn!("{} move {} failed: {}", snapshot.id, dir, err);
            navigator.reset();
            None
        }
    }
}

fn nearest_hazard(snapshot: &SensingSnapshot, radius_sq: i32) -> Option<&Entity> {
    let here = snapshot.position;
    snapshot
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Hazard || e.allegiance == Allegiance::Hazard)
        .filter(|e| e.position.distance_sq(here) <= radius_sq)
        .min_by_key(|e| e.position.distance_sq(here))
}
