//! Immediate-action fallthrough.
//!
//! A fixed-priority selector over the agent's one interaction per tick:
//! strike through the kiting machine, hand carried resources to the own
//! leader, collect an adjacent resource. Steps run in order and the first
//! success ends the tick's interaction; a closed capability gate or a host
//! rejection is an ordinary failure that falls through to the next step.
use agent_core::{Direction, EntityId, KiteAction, KiteMachine, Position, SensingSnapshot};

use crate::api::{Actuator, InteractTarget};
use crate::config::RuntimeConfig;
use crate::movement::MoveIntent;
use crate::roles::Plan;

/// Interaction performed this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTaken {
    Attack { target: EntityId, killed: bool },
    Deliver { amount: i32 },
    Collect { position: Position, amount: i32 },
}

/// Result of one selector step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

/// Working state threaded through the selector steps.
pub struct Immediate<'a> {
    pub snapshot: &'a SensingSnapshot,
    pub plan: &'a Plan,
    pub config: &'a RuntimeConfig,
    pub kite: &'a mut KiteMachine,
    /// Movement the kiting machine asked for, if it ran.
    pub kite_intent: Option<MoveIntent>,
    pub turned: Option<Direction>,
    pub taken: Option<ActionTaken>,
}

impl<'a> Immediate<'a> {
    pub fn new(
        snapshot: &'a SensingSnapshot,
        plan: &'a Plan,
        config: &'a RuntimeConfig,
        kite: &'a mut KiteMachine,
    ) -> Self {
        Self {
            snapshot,
            plan,
            config,
            kite,
            kite_intent: None,
            turned: None,
            taken: None,
        }
    }
}

type Step = fn(&mut Immediate<'_>, &mut dyn Actuator) -> Status;

const SEQUENCE: [(&str, Step); 3] = [("attack", attack), ("deliver", deliver), ("collect", collect)];

/// Runs the selector; returns the interaction that succeeded, if any.
pub fn run(imm: &mut Immediate<'_>, actuator: &mut dyn Actuator) -> Option<ActionTaken> {
    if imm.plan.engage.is_none() {
        // Out of reach mid-retreat: keep backing off from the last sighting.
        match imm.kite.keep_retreating(imm.snapshot, |dir| actuator.can_move(dir)) {
            Some(KiteAction::Retreat(dir)) => imm.kite_intent = Some(MoveIntent::Step(dir)),
            Some(_) => imm.kite_intent = Some(MoveIntent::Hold),
            None if imm.kite.target().is_some() => imm.kite.reset(),
            None => {}
        }
    }
    for (name, step) in SEQUENCE {
        if step(imm, actuator) == Status::Success {
            tracing::debug!("{} immediate action: {}", imm.snapshot.id, name);
            return imm.taken;
        }
    }
    None
}

fn attack(imm: &mut Immediate<'_>, actuator: &mut dyn Actuator) -> Status {
    let Some(target) = imm.plan.engage else {
        return Status::Failure;
    };
    let action = imm.kite.tick(imm.snapshot, &target, &imm.config.agent.kite, |dir| {
        actuator.can_move(dir)
    });
    let (id, position) = match action {
        KiteAction::Approach(position) => {
            imm.kite_intent = Some(MoveIntent::Toward(position));
            return Status::Failure;
        }
        KiteAction::Retreat(dir) => {
            imm.kite_intent = Some(MoveIntent::Step(dir));
            return Status::Failure;
        }
        KiteAction::Hold => {
            imm.kite_intent = Some(MoveIntent::Hold);
            return Status::Failure;
        }
        KiteAction::Attack { target, position } => {
            imm.kite_intent = Some(MoveIntent::Hold);
            (target, position)
        }
    };

    let target = InteractTarget::Entity { id, position };
    if !actuator.can_interact(&target) {
        face(imm, actuator, position);
        if !actuator.can_interact(&target) {
            return Status::Failure;
        }
    }
    match actuator.try_interact(target, None) {
        Ok(outcome) => {
            imm.taken = Some(ActionTaken::Attack {
                target: id,
                killed: outcome.killed,
            });
            Status::Success
        }
        Err(err) => {
            tracing::warn!("{} attack on {} failed: {}", imm.snapshot.id, id, err);
            Status::Failure
        }
    }
}

/// Turns toward `position` when the host allows it; attacks may need facing.
fn face(imm: &mut Immediate<'_>, actuator: &mut dyn Actuator, position: Position) {
    let dir = imm.snapshot.position.direction_to(position);
    if dir.is_center() || dir == imm.snapshot.facing || !actuator.can_turn(dir) {
        return;
    }
    match actuator.try_turn(dir) {
        Ok(()) => imm.turned = Some(dir),
        Err(err) => tracing::warn!("{} turn {} failed: {}", imm.snapshot.id, dir, err),
    }
}

fn deliver(imm: &mut Immediate<'_>, actuator: &mut dyn Actuator) -> Status {
    let snap = imm.snapshot;
    if !snap.is_carrying() || snap.is_leader() {
        return Status::Failure;
    }
    let Some(leader) = snap.own_leader() else {
        return Status::Failure;
    };
    if snap.position.distance_sq(leader.position) > imm.config.agent.roles.delivery_range_sq {
        return Status::Failure;
    }
    let target = InteractTarget::Entity {
        id: leader.id,
        position: leader.position,
    };
    if !actuator.can_interact(&target) {
        return Status::Failure;
    }
    match actuator.try_interact(target, Some(snap.carried)) {
        Ok(outcome) => {
            imm.taken = Some(ActionTaken::Deliver {
                amount: outcome.transferred,
            });
            Status::Success
        }
        Err(err) => {
            tracing::warn!("{} delivery failed: {}", snap.id, err);
            Status::Failure
        }
    }
}

fn collect(imm: &mut Immediate<'_>, actuator: &mut dyn Actuator) -> Status {
    let snap = imm.snapshot;
    let Some(cell) = snap
        .resources
        .iter()
        .find(|c| c.amount > 0 && c.position.distance_sq(snap.position) <= 2)
    else {
        return Status::Failure;
    };
    let target = InteractTarget::Cell(cell.position);
    if !actuator.can_interact(&target) {
        return Status::Failure;
    }
    match actuator.try_interact(target, None) {
        Ok(outcome) => {
            imm.taken = Some(ActionTaken::Collect {
                position: cell.position,
                amount: outcome.transferred,
            });
            Status::Success
        }
        Err(err) => {
            tracing::warn!("{} collect at {} failed: {}", snap.id, cell.position, err);
            Status::Failure
        }
    }
}
