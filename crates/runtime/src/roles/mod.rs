//! Role classification and per-role planning.
//!
//! Every agent's role is a pure function of its identity and kind,
//! re-evaluated each tick by [`Role::classify`]. Each variant has one
//! planning handler that turns the sensed world plus the team view into a
//! [`Plan`]; the orchestrator then executes the plan through the immediate
//! action fallthrough and the navigator.
mod flex;
mod guardian;
pub mod leader;
mod specialist;

pub use leader::{LeaderReport, LeaderState};

use agent_core::{
    AttackWindow, Commitment, Entity, EntityId, EntityKind, Objective, Position, PostRushPhase,
    RoleConfig, SensingSnapshot,
};

use crate::channel::TeamView;
use crate::config::RuntimeConfig;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    Leader,
    /// Stays inside a ring around the own leader and intercepts threats.
    Guardian,
    /// Follows the value function.
    Flex,
    /// Offensive sub-roles, see [`Specialty`].
    Specialist,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Specialty {
    Scout,
    Raider,
    Assassin,
}

impl Role {
    /// Leaders by kind, everyone else by `id % 100` against the configured split.
    pub const fn classify(id: EntityId, kind: EntityKind, config: &RoleConfig) -> Role {
        if matches!(kind, EntityKind::Leader) {
            return Role::Leader;
        }
        let bucket = id.get() % 100;
        if bucket < config.guardian_percent {
            Role::Guardian
        } else if bucket < config.flex_percent {
            Role::Flex
        } else {
            Role::Specialist
        }
    }

    /// Runs this role's planning handler.
    pub fn plan(self, inputs: &PlanInputs<'_>) -> Plan {
        match self {
            Role::Leader => leader::plan(inputs),
            Role::Guardian => guardian::plan(inputs),
            Role::Flex => flex::plan(inputs),
            Role::Specialist => specialist::plan(inputs),
        }
    }
}

impl Specialty {
    /// Picks the specialist mode for this tick.
    ///
    /// Assassins are chosen by identity, by an escalated team or by an open
    /// leader window; raiders once the game is under way; scouts otherwise.
    pub fn choose(id: EntityId, view: &TeamView, tick: u32, config: &RoleConfig) -> Specialty {
        let divisor = config.assassin_divisor.max(1);
        let wounded_leader = view
            .hostile_leader_health
            .is_some_and(|hp| hp < config.assassin_hostile_health);
        let leader_window = matches!(
            view.window,
            AttackWindow::WoundedLeader | AttackWindow::PostRush | AttackWindow::ArmyAdvantage
        );
        if id.get() % divisor == 0
            || view.commitment >= Commitment::Assault
            || tick > config.assassin_tick
            || wounded_leader
            || view.all_in
            || leader_window
        {
            return Specialty::Assassin;
        }
        if view.commitment == Commitment::Raid
            || view.post_rush == PostRushPhase::EconomyRaid
            || tick > config.early_game_tick
            || view.hostile_leader_confirmed
        {
            return Specialty::Raider;
        }
        Specialty::Scout
    }
}

/// Everything a planning handler may look at.
#[derive(Debug, Clone, Copy)]
pub struct PlanInputs<'a> {
    pub snapshot: &'a SensingSnapshot,
    pub view: &'a TeamView,
    /// Value-function choice for this tick.
    pub objective: Objective,
    pub config: &'a RuntimeConfig,
}

impl PlanInputs<'_> {
    /// Hostile named by the objective, when it is still sensed.
    fn objective_target(&self) -> Option<Entity> {
        if !self.objective.kind.is_attack() {
            return None;
        }
        self.objective
            .target
            .and_then(|id| self.snapshot.hostile_by_id(id))
            .copied()
    }

    /// Closest hostile already in striking range.
    fn adjacent_hostile(&self) -> Option<Entity> {
        let reach = self.config.agent.kite.engage_distance_sq;
        nearest(self.snapshot, |e| {
            e.is_hostile() && e.position.distance_sq(self.snapshot.position) <= reach
        })
    }

    /// Own leader position: sensed first, then the channel.
    fn own_leader(&self) -> Option<Position> {
        self.snapshot
            .own_leader()
            .map(|e| e.position)
            .or(self.view.own_leader)
    }
}

/// What one role wants this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plan {
    /// Hostile to run the kiting machine against.
    pub engage: Option<Entity>,
    /// Where to walk when not engaged.
    pub destination: Option<Position>,
    /// Threat to step away from instead of walking.
    pub flee_from: Option<Position>,
    /// Fixed target near which hazards are ignored.
    pub charge_anchor: Option<Position>,
    pub specialty: Option<Specialty>,
}

/// Closest sensed entity matching `filter`, ties broken by sensing order.
fn nearest(snapshot: &SensingSnapshot, mut filter: impl FnMut(&Entity) -> bool) -> Option<Entity> {
    let here = snapshot.position;
    snapshot
        .entities
        .iter()
        .filter(|e| filter(e))
        .fold(None, |best: Option<&Entity>, e| match best {
            Some(b) if b.position.distance_sq(here) <= e.position.distance_sq(here) => Some(b),
            _ => Some(e),
        })
        .copied()
}
