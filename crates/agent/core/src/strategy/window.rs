//! Attack windows: named opportunities that impose a commitment floor.

use crate::config::WindowConfig;
use crate::sensing::Tick;

use super::{Commitment, GameState, OpponentKind};

/// Ordered by detection priority, highest first in [`AttackWindow::detect`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum AttackWindow {
    #[default]
    None = 0,
    PostRush = 1,
    Economy = 2,
    WoundedLeader = 3,
    ArmyAdvantage = 4,
    LateGame = 5,
    TurtlePunish = 6,
}

impl AttackWindow {
    pub const ALL: [AttackWindow; 7] = [
        AttackWindow::None,
        AttackWindow::PostRush,
        AttackWindow::Economy,
        AttackWindow::WoundedLeader,
        AttackWindow::ArmyAdvantage,
        AttackWindow::LateGame,
        AttackWindow::TurtlePunish,
    ];

    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    pub const fn from_raw(raw: i32) -> Option<AttackWindow> {
        if raw >= 0 && (raw as usize) < Self::ALL.len() {
            Some(Self::ALL[raw as usize])
        } else {
            None
        }
    }

    /// Whether the value function should add the leader-window bonus.
    #[inline]
    pub const fn targets_leader(self) -> bool {
        matches!(
            self,
            AttackWindow::WoundedLeader
                | AttackWindow::ArmyAdvantage
                | AttackWindow::LateGame
                | AttackWindow::TurtlePunish
        )
    }

    /// Minimum commitment an open window imposes.
    pub const fn commitment_floor(self) -> Option<Commitment> {
        match self {
            AttackWindow::None => None,
            AttackWindow::WoundedLeader => Some(Commitment::AllIn),
            AttackWindow::PostRush | AttackWindow::TurtlePunish => Some(Commitment::Raid),
            AttackWindow::ArmyAdvantage | AttackWindow::Economy | AttackWindow::LateGame => {
                Some(Commitment::Assault)
            }
        }
    }

    /// Picks the highest-priority open window.
    ///
    /// Survive, or enough hostiles at the leader, closes every window.
    pub fn detect(inputs: &WindowInputs, config: &WindowConfig) -> AttackWindow {
        if inputs.game_state == GameState::Survive
            || inputs.hostiles_near_leader >= config.emergency_threat
        {
            return AttackWindow::None;
        }
        let round = inputs.tick.get();
        if inputs
            .hostile_leader_health
            .is_some_and(|hp| hp > 0 && hp < config.wounded_leader_health)
        {
            AttackWindow::WoundedLeader
        } else if inputs.recently_rushed && inputs.hostiles_near_leader == 0 {
            AttackWindow::PostRush
        } else if inputs.army_advantage >= config.army_advantage
            && inputs.leader_health > config.army_min_health
        {
            AttackWindow::ArmyAdvantage
        } else if inputs.team_reserve >= config.economy_reserve
            && inputs.leader_health > config.economy_min_health
        {
            AttackWindow::Economy
        } else if inputs.opponent == OpponentKind::Turtling && round > config.turtle_punish_tick {
            AttackWindow::TurtlePunish
        } else if round >= config.late_game_tick {
            AttackWindow::LateGame
        } else {
            AttackWindow::None
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowInputs {
    pub tick: Tick,
    pub game_state: GameState,
    pub leader_health: i32,
    pub team_reserve: i32,
    pub army_advantage: i32,
    pub hostile_leader_health: Option<i32>,
    pub hostiles_near_leader: i32,
    pub recently_rushed: bool,
    pub opponent: OpponentKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> WindowInputs {
        WindowInputs {
            tick: Tick(60),
            game_state: GameState::Pressure,
            leader_health: 400,
            team_reserve: 300,
            army_advantage: 0,
            hostile_leader_health: None,
            hostiles_near_leader: 0,
            recently_rushed: false,
            opponent: OpponentKind::Balanced,
        }
    }

    fn detect(inputs: WindowInputs) -> AttackWindow {
        AttackWindow::detect(&inputs, &WindowConfig::default())
    }

    #[test]
    fn nothing_open_in_a_quiet_early_game() {
        assert_eq!(detect(quiet()), AttackWindow::None);
    }

    #[test]
    fn wounded_leader_beats_every_other_window() {
        let inputs = WindowInputs {
            hostile_leader_health: Some(300),
            recently_rushed: true,
            army_advantage: 10,
            team_reserve: 1000,
            tick: Tick(400),
            ..quiet()
        };
        assert_eq!(detect(inputs), AttackWindow::WoundedLeader);
        assert_eq!(
            AttackWindow::WoundedLeader.commitment_floor(),
            Some(Commitment::AllIn)
        );
    }

    #[test]
    fn priority_order_below_wounded_leader() {
        let rushed = WindowInputs {
            recently_rushed: true,
            army_advantage: 5,
            ..quiet()
        };
        assert_eq!(detect(rushed), AttackWindow::PostRush);

        let army = WindowInputs {
            army_advantage: 3,
            team_reserve: 900,
            ..quiet()
        };
        assert_eq!(detect(army), AttackWindow::ArmyAdvantage);

        let rich = WindowInputs {
            team_reserve: 900,
            ..quiet()
        };
        assert_eq!(detect(rich), AttackWindow::Economy);

        let turtle = WindowInputs {
            opponent: OpponentKind::Turtling,
            tick: Tick(101),
            ..quiet()
        };
        assert_eq!(detect(turtle), AttackWindow::TurtlePunish);

        let late = WindowInputs {
            tick: Tick(250),
            ..quiet()
        };
        assert_eq!(detect(late), AttackWindow::LateGame);
    }

    #[test]
    fn survive_or_emergency_closes_windows() {
        let survive = WindowInputs {
            game_state: GameState::Survive,
            hostile_leader_health: Some(100),
            ..quiet()
        };
        assert_eq!(detect(survive), AttackWindow::None);

        let swarmed = WindowInputs {
            hostiles_near_leader: 3,
            tick: Tick(300),
            ..quiet()
        };
        assert_eq!(detect(swarmed), AttackWindow::None);
    }

    #[test]
    fn raw_round_trip() {
        for window in AttackWindow::ALL {
            assert_eq!(AttackWindow::from_raw(window.as_raw()), Some(window));
        }
    }
}
