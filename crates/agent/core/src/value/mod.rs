//! Target value function.
//!
//! Candidates are gathered from the sensing snapshot with their situational
//! modifiers already applied ([`gather_candidates`]); [`select_target`] then
//! scores them under the current weights and picks exactly one objective.
//! Both steps are pure and allocation-free.
mod candidate;
mod select;

pub use candidate::{Candidate, CandidateList, Situation, gather_candidates};
pub use select::{Fallback, score, select_target};

use crate::config::TuningProfile;
use crate::grid::Position;
use crate::sensing::EntityId;
use crate::strategy::GameState;

/// Category of an objective. Declaration order is the tie-break priority.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ObjectiveKind {
    Delivery,
    HostileLeader,
    HostileOrdinary,
    Resource,
    Patrol,
    #[default]
    None,
}

impl ObjectiveKind {
    /// Lower wins when two candidates score the same.
    #[inline]
    pub const fn priority(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn is_attack(self) -> bool {
        matches!(self, ObjectiveKind::HostileLeader | ObjectiveKind::HostileOrdinary)
    }
}

/// The one objective chosen for this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub position: Option<Position>,
    pub target: Option<EntityId>,
    pub score: i32,
}

impl Objective {
    pub const NONE: Self = Self {
        kind: ObjectiveKind::None,
        position: None,
        target: None,
        score: 0,
    };
}

/// Per-category weights in percent.
///
/// Patrol has no column: it is never gathered as a candidate and only
/// appears as the fixed-score fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weights {
    pub hostile_leader: i32,
    pub hostile_ordinary: i32,
    pub resource: i32,
    pub delivery: i32,
}

impl Weights {
    pub const SURVIVE: Self = Self::new(50, 30, 150, 200);
    pub const PRESSURE: Self = Self::new(100, 100, 100, 100);
    pub const EXECUTE: Self = Self::new(250, 80, 50, 80);

    pub const fn new(hostile_leader: i32, hostile_ordinary: i32, resource: i32, delivery: i32) -> Self {
        Self {
            hostile_leader,
            hostile_ordinary,
            resource,
            delivery,
        }
    }

    /// State weights with the tuning profile applied: attack scales the
    /// hostile columns, economy scales resource and delivery.
    pub const fn for_state(state: GameState, profile: &TuningProfile) -> Self {
        let base = match state {
            GameState::Survive => Self::SURVIVE,
            GameState::Pressure => Self::PRESSURE,
            GameState::Execute => Self::EXECUTE,
        };
        Self {
            hostile_leader: profile.scale_attack(base.hostile_leader),
            hostile_ordinary: profile.scale_attack(base.hostile_ordinary),
            resource: profile.scale_economy(base.resource),
            delivery: profile.scale_economy(base.delivery),
        }
    }

    #[inline]
    pub const fn for_kind(&self, kind: ObjectiveKind) -> i32 {
        match kind {
            ObjectiveKind::Delivery => self.delivery,
            ObjectiveKind::HostileLeader => self.hostile_leader,
            ObjectiveKind::HostileOrdinary => self.hostile_ordinary,
            ObjectiveKind::Resource => self.resource,
            ObjectiveKind::Patrol | ObjectiveKind::None => 0,
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::PRESSURE
    }
}
