//! Opponent behaviour classifier and the counter-strategy table.

use crate::config::OpponentConfig;
use crate::sensing::Tick;

use super::Commitment;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum OpponentKind {
    #[default]
    Unknown = 0,
    Rushing = 1,
    Turtling = 2,
    Balanced = 3,
    Desperate = 4,
}

impl OpponentKind {
    pub const ALL: [OpponentKind; 5] = [
        OpponentKind::Unknown,
        OpponentKind::Rushing,
        OpponentKind::Turtling,
        OpponentKind::Balanced,
        OpponentKind::Desperate,
    ];

    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    pub const fn from_raw(raw: i32) -> Option<OpponentKind> {
        if raw >= 0 && (raw as usize) < Self::ALL.len() {
            Some(Self::ALL[raw as usize])
        } else {
            None
        }
    }
}

/// Counter-attack sequence after surviving a rush.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum PostRushPhase {
    #[default]
    None = 0,
    Stabilize = 1,
    EconomyRaid = 2,
    AssaultPrep = 3,
    LeaderAssault = 4,
}

impl PostRushPhase {
    pub const ALL: [PostRushPhase; 5] = [
        PostRushPhase::None,
        PostRushPhase::Stabilize,
        PostRushPhase::EconomyRaid,
        PostRushPhase::AssaultPrep,
        PostRushPhase::LeaderAssault,
    ];

    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    pub const fn from_raw(raw: i32) -> Option<PostRushPhase> {
        if raw >= 0 && (raw as usize) < Self::ALL.len() {
            Some(Self::ALL[raw as usize])
        } else {
            None
        }
    }
}

/// What the leader saw this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpponentObservation {
    pub tick: Tick,
    pub hostiles_near_leader: i32,
    pub hostiles_visible: i32,
    pub hostile_leader_health: Option<i32>,
}

/// Inputs that decide which post-rush phase applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PostRushInputs {
    pub leader_health: i32,
    pub team_reserve: i32,
    pub army_advantage: i32,
    pub hostile_leader_health: Option<i32>,
}

/// Cumulative classifier. Owned by the leader; its outputs are mirrored to
/// the channel so other agents read them instead of re-deriving.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpponentClassifier {
    kind: OpponentKind,
    near_leader_total: i32,
    seen_total: i32,
    rush_survived_at: Option<Tick>,
}

impl OpponentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> OpponentKind {
        self.kind
    }

    pub fn near_leader_total(&self) -> i32 {
        self.near_leader_total
    }

    pub fn seen_total(&self) -> i32 {
        self.seen_total
    }

    pub fn rush_survived_at(&self) -> Option<Tick> {
        self.rush_survived_at
    }

    /// Restores a survival tick read back from the channel.
    pub fn restore_rush_survived(&mut self, tick: Option<Tick>) {
        self.rush_survived_at = tick;
    }

    /// Folds one observation in. Returns `true` when the classification changed.
    pub fn observe(&mut self, obs: &OpponentObservation, config: &OpponentConfig) -> bool {
        self.near_leader_total = self.near_leader_total.saturating_add(obs.hostiles_near_leader);
        self.seen_total = self.seen_total.saturating_add(obs.hostiles_visible);

        let round = obs.tick.get();
        let mut next = self.kind;
        if round <= config.rush_detection_tick {
            if self.near_leader_total >= config.rush_hostile_threshold {
                next = OpponentKind::Rushing;
            }
        } else if round >= config.turtle_detection_tick && self.kind == OpponentKind::Unknown {
            next = if self.seen_total < config.turtle_hostile_threshold {
                OpponentKind::Turtling
            } else {
                OpponentKind::Balanced
            };
        }

        if obs
            .hostile_leader_health
            .is_some_and(|hp| hp > 0 && hp < config.desperate_health)
        {
            next = OpponentKind::Desperate;
        }

        if self.kind == OpponentKind::Rushing
            && obs.hostiles_near_leader == 0
            && round > config.rush_detection_tick
            && self.rush_survived_at.is_none()
        {
            self.rush_survived_at = Some(obs.tick);
        }

        let changed = next != self.kind;
        self.kind = next;
        changed
    }

    /// True while within the post-rush window after surviving a rush.
    pub fn recently_rushed(&self, now: Tick, config: &OpponentConfig) -> bool {
        self.rush_survived_at
            .is_some_and(|at| now.since(at) <= config.post_rush_duration)
    }

    pub fn post_rush_phase(
        &self,
        now: Tick,
        inputs: &PostRushInputs,
        config: &OpponentConfig,
    ) -> PostRushPhase {
        let Some(at) = self.rush_survived_at else {
            return PostRushPhase::None;
        };
        if !self.recently_rushed(now, config) {
            return PostRushPhase::None;
        }
        let elapsed = now.since(at);
        if elapsed < config.stabilize_ticks
            && (inputs.leader_health < config.stabilize_health
                || inputs.team_reserve < config.stabilize_reserve)
        {
            return PostRushPhase::Stabilize;
        }
        if inputs.army_advantage > config.leader_assault_advantage
            || inputs
                .hostile_leader_health
                .is_some_and(|hp| hp < config.leader_assault_hostile_health)
        {
            return PostRushPhase::LeaderAssault;
        }
        if elapsed > config.assault_prep_ticks {
            return PostRushPhase::AssaultPrep;
        }
        PostRushPhase::EconomyRaid
    }
}

/// Commitment the counter-strategy table recommends for `kind`.
///
/// Returns `None` for a balanced or unknown opponent (keep the current level).
pub const fn counter_commitment(
    kind: OpponentKind,
    recently_rushed: bool,
    phase: PostRushPhase,
) -> Option<Commitment> {
    match kind {
        OpponentKind::Rushing if recently_rushed => Some(match phase {
            PostRushPhase::LeaderAssault => Commitment::AllIn,
            PostRushPhase::AssaultPrep => Commitment::Assault,
            PostRushPhase::EconomyRaid => Commitment::Raid,
            PostRushPhase::Stabilize | PostRushPhase::None => Commitment::Defend,
        }),
        OpponentKind::Rushing => Some(Commitment::Defend),
        OpponentKind::Turtling => Some(Commitment::Probe),
        OpponentKind::Desperate => Some(Commitment::Defend),
        OpponentKind::Balanced | OpponentKind::Unknown => None,
    }
}
