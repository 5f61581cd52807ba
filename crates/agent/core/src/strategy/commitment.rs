//! Attack commitment ladder.

use crate::config::{CommitmentConfig, TuningProfile};

/// How much of the team is pushed toward offence. Ordered: escalation moves up.
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
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum Commitment {
    Defend = 0,
    #[default]
    Probe = 1,
    Raid = 2,
    Assault = 3,
    AllIn = 4,
}

impl Commitment {
    pub const ALL: [Commitment; 5] = [
        Commitment::Defend,
        Commitment::Probe,
        Commitment::Raid,
        Commitment::Assault,
        Commitment::AllIn,
    ];

    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    pub const fn from_raw(raw: i32) -> Option<Commitment> {
        if raw >= 0 && (raw as usize) < Self::ALL.len() {
            Some(Self::ALL[raw as usize])
        } else {
            None
        }
    }

    /// Opening commitment for a tuning profile: aggressive profiles start higher.
    pub const fn starting(profile: &TuningProfile) -> Commitment {
        match profile.attack {
            a if a >= 150 => Commitment::Assault,
            a if a >= 120 => Commitment::Raid,
            a if a >= 80 => Commitment::Probe,
            _ => Commitment::Defend,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitmentInputs {
    pub threat: i32,
    pub team_reserve: i32,
    pub leader_health: i32,
    pub hostile_leader_health: Option<i32>,
    pub hostile_leader_confirmed: bool,
    pub army_advantage: i32,
    pub kills: i32,
}

impl CommitmentInputs {
    /// True when the local leader is under enough pressure to abandon offence.
    pub const fn in_danger(&self, config: &CommitmentConfig) -> bool {
        self.threat > config.danger_threat
            || self.team_reserve < config.danger_reserve
            || self.leader_health < config.danger_health
    }
}

/// Evaluates the ladder once.
///
/// Danger wins outright and returns `Defend`, ignoring every raise. Otherwise
/// the base ladder escalates, then the counter-strategy and attack-window
/// floors may raise the result but never lower it.
pub fn next_commitment(
    current: Commitment,
    inputs: &CommitmentInputs,
    counter: Option<Commitment>,
    window_floor: Option<Commitment>,
    config: &CommitmentConfig,
) -> Commitment {
    if inputs.in_danger(config) {
        return Commitment::Defend;
    }

    let leader_low = inputs
        .hostile_leader_health
        .is_some_and(|hp| hp < config.all_in_hostile_health);

    let escalated = if leader_low && inputs.leader_health > config.all_in_min_health {
        Commitment::AllIn
    } else if inputs.army_advantage > config.assault_advantage && current < Commitment::Assault {
        Commitment::Assault
    } else if inputs.kills >= config.raid_kills && current < Commitment::Raid {
        Commitment::Raid
    } else if inputs.hostile_leader_confirmed && current < Commitment::Probe {
        Commitment::Probe
    } else {
        current
    };

    escalated
        .max(counter.unwrap_or(Commitment::Defend))
        .max(window_floor.unwrap_or(Commitment::Defend))
}
