//! Survive / Pressure / Execute state machine with hysteresis.

use crate::config::{StateThresholds, TuningProfile};

/// Team-wide posture. Drives the weight set of the value function.
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
pub enum GameState {
    Survive = 0,
    #[default]
    Pressure = 1,
    Execute = 2,
}

impl GameState {
    pub const ALL: [GameState; 3] = [GameState::Survive, GameState::Pressure, GameState::Execute];

    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    pub const fn from_raw(raw: i32) -> Option<GameState> {
        match raw {
            0 => Some(GameState::Survive),
            1 => Some(GameState::Pressure),
            2 => Some(GameState::Execute),
            _ => None,
        }
    }
}

/// Aggregates the state machine reads each evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateInputs {
    pub leader_health: i32,
    pub team_reserve: i32,
    pub threat: i32,
    /// `None` when the hostile leader's health is unknown or stale.
    pub hostile_leader_health: Option<i32>,
    pub army_advantage: i32,
}

impl GameState {
    /// Evaluates one transition.
    ///
    /// Leaving Survive needs every exit threshold crossed at once; entering it
    /// needs only one entry threshold. Execute is entered on a low hostile
    /// leader or a large advantage with reserve, and left only on the looser
    /// exit pair.
    pub fn next(
        self,
        inputs: &StateInputs,
        thresholds: &StateThresholds,
        profile: &TuningProfile,
    ) -> GameState {
        let t = thresholds;
        let enter_survive = inputs.leader_health < t.survive_enter_health
            || inputs.team_reserve < profile.scale_economy(t.survive_enter_reserve)
            || inputs.threat > t.survive_enter_threat;
        let exit_survive = inputs.leader_health > t.survive_exit_health
            && inputs.team_reserve > profile.scale_economy(t.survive_exit_reserve)
            && inputs.threat < t.survive_exit_threat;

        let enter_execute = inputs
            .hostile_leader_health
            .is_some_and(|hp| hp < t.execute_enter_hostile_health)
            || (inputs.army_advantage > t.execute_enter_advantage
                && inputs.team_reserve > profile.scale_economy(t.execute_min_reserve));
        let exit_execute = inputs
            .hostile_leader_health
            .is_none_or(|hp| hp > t.execute_exit_hostile_health)
            && inputs.army_advantage < t.execute_exit_advantage;

        match self {
            GameState::Survive if !exit_survive => GameState::Survive,
            GameState::Survive if enter_execute => GameState::Execute,
            GameState::Survive => GameState::Pressure,
            _ if enter_survive => GameState::Survive,
            GameState::Execute if exit_execute => GameState::Pressure,
            GameState::Execute => GameState::Execute,
            GameState::Pressure if enter_execute => GameState::Execute,
            GameState::Pressure => GameState::Pressure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm() -> StateInputs {
        StateInputs {
            leader_health: 450,
            team_reserve: 600,
            threat: 0,
            hostile_leader_health: None,
            army_advantage: 0,
        }
    }

    fn step(state: GameState, inputs: StateInputs) -> GameState {
        state.next(&inputs, &StateThresholds::default(), &TuningProfile::BALANCED)
    }

    #[test]
    fn any_single_entry_condition_enters_survive() {
        let low_health = StateInputs { leader_health: 250, ..calm() };
        let low_reserve = StateInputs { team_reserve: 150, ..calm() };
        let threatened = StateInputs { threat: 7, ..calm() };
        for inputs in [low_health, low_reserve, threatened] {
            assert_eq!(step(GameState::Pressure, inputs), GameState::Survive);
            assert_eq!(step(GameState::Execute, inputs), GameState::Survive);
        }
    }

    #[test]
    fn survive_exit_requires_all_conditions() {
        let almost = StateInputs { threat: 3, ..calm() };
        assert_eq!(step(GameState::Survive, almost), GameState::Survive);
        assert_eq!(step(GameState::Survive, calm()), GameState::Pressure);

        let winning = StateInputs {
            hostile_leader_health: Some(150),
            ..calm()
        };
        assert_eq!(step(GameState::Survive, winning), GameState::Execute);
    }

    #[test]
    fn execute_needs_looser_exit() {
        let wounded = StateInputs {
            hostile_leader_health: Some(190),
            ..calm()
        };
        assert_eq!(step(GameState::Pressure, wounded), GameState::Execute);

        let recovering = StateInputs {
            hostile_leader_health: Some(230),
            ..calm()
        };
        assert_eq!(step(GameState::Execute, recovering), GameState::Execute);
        assert_eq!(step(GameState::Pressure, recovering), GameState::Pressure);

        let healed = StateInputs {
            hostile_leader_health: Some(260),
            ..calm()
        };
        assert_eq!(step(GameState::Execute, healed), GameState::Pressure);
    }

    #[test]
    fn advantage_enters_execute_only_with_reserve() {
        let broke = StateInputs {
            army_advantage: 60,
            team_reserve: 450,
            ..calm()
        };
        assert_eq!(step(GameState::Pressure, broke), GameState::Pressure);
        let rich = StateInputs {
            army_advantage: 60,
            team_reserve: 900,
            ..calm()
        };
        assert_eq!(step(GameState::Pressure, rich), GameState::Execute);
    }

    #[test]
    fn oscillating_midpoint_inputs_change_state_at_most_once() {
        // Each pair straddles the midpoint between entry and exit thresholds.
        let low = StateInputs {
            leader_health: 340,
            team_reserve: 290,
            threat: 4,
            ..calm()
        };
        let high = StateInputs {
            leader_health: 360,
            team_reserve: 310,
            threat: 5,
            ..calm()
        };
        for start in GameState::ALL {
            let mut state = start;
            let mut changes = 0;
            for i in 0..200 {
                let next = step(state, if i % 2 == 0 { low } else { high });
                if next != state {
                    changes += 1;
                }
                state = next;
            }
            assert!(changes <= 1, "{start} flapped {changes} times");
        }
    }

    #[test]
    fn crossing_entry_once_then_hovering_stays_in_survive() {
        let mut state = GameState::Pressure;
        let dip = StateInputs { leader_health: 290, ..calm() };
        let hover = StateInputs { leader_health: 350, ..calm() };
        state = step(state, dip);
        assert_eq!(state, GameState::Survive);
        for i in 0..50 {
            state = step(state, if i % 2 == 0 { hover } else { dip });
            assert_eq!(state, GameState::Survive);
        }
    }

    #[test]
    fn raw_round_trip() {
        for state in GameState::ALL {
            assert_eq!(GameState::from_raw(state.as_raw()), Some(state));
        }
        assert_eq!(GameState::from_raw(7), None);
        assert_eq!("execute".parse::<GameState>().ok(), Some(GameState::Execute));
    }
}
