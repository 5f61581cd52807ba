//! Two-agent melee micro: approach, strike, back off.

use crate::config::KiteConfig;
use crate::grid::{Direction, Position};
use crate::nav::flee_step;
use crate::sensing::{Entity, EntityId, SensingSnapshot};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum KiteState {
    #[default]
    Approach,
    Attack,
    Retreat,
}

/// What the kiting machine wants done this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KiteAction {
    /// Navigate toward the target; the caller owns pathing.
    Approach(Position),
    Attack { target: EntityId, position: Position },
    Retreat(Direction),
    Hold,
}

/// Per-agent kiting state, reset whenever the kited hostile changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KiteMachine {
    state: KiteState,
    retreat_left: u8,
    target: Option<EntityId>,
    last_seen: Option<Position>,
}

impl KiteMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> KiteState {
        self.state
    }

    pub fn retreat_left(&self) -> u8 {
        self.retreat_left
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advances the machine one tick against `target`.
    ///
    /// `passable` is the host movement check, used only while retreating.
    pub fn tick<F>(
        &mut self,
        snapshot: &SensingSnapshot,
        target: &Entity,
        config: &KiteConfig,
        passable: F,
    ) -> KiteAction
    where
        F: FnMut(Direction) -> bool,
    {
        if self.target != Some(target.id) {
            self.reset();
            self.target = Some(target.id);
        }
        self.last_seen = Some(target.position);

        if let Some(action) = self.keep_retreating(snapshot, passable) {
            return action;
        }

        let engaged = snapshot.position.distance_sq(target.position) <= config.engage_distance_sq;
        if !engaged {
            self.state = KiteState::Approach;
            return KiteAction::Approach(target.position);
        }
        if !snapshot.action_ready {
            self.state = KiteState::Attack;
            return KiteAction::Hold;
        }

        let steps = retreat_steps(snapshot.health, config);
        if steps > 0 {
            self.retreat_left = steps;
            self.state = KiteState::Retreat;
        } else {
            self.state = KiteState::Attack;
        }
        KiteAction::Attack {
            target: target.id,
            position: target.position,
        }
    }

    /// Spends one retreat step away from where the kited hostile was last
    /// seen. `None` once the counter is empty or when not retreating.
    ///
    /// Used directly on ticks where the hostile is out of reach or out of
    /// sight, so losing contact never shortens a retreat.
    pub fn keep_retreating<F>(&mut self, snapshot: &SensingSnapshot, passable: F) -> Option<KiteAction>
    where
        F: FnMut(Direction) -> bool,
    {
        if self.state != KiteState::Retreat || self.retreat_left == 0 {
            return None;
        }
        let threat = self.last_seen?;
        let dir = flee_step(snapshot.position, threat, snapshot.hazards, passable);
        // A blocked retreat still spends the step.
        self.retreat_left -= 1;
        Some(if dir.is_center() {
            KiteAction::Hold
        } else {
            KiteAction::Retreat(dir)
        })
    }
}

/// Retreat length after a strike; healthy agents keep swinging.
pub const fn retreat_steps(health: i32, config: &KiteConfig) -> u8 {
    if health >= config.healthy_health {
        0
    } else if health < config.critical_health {
        config.critical_retreat_steps
    } else if health < config.wounded_health {
        config.wounded_retreat_steps
    } else {
        config.retreat_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensing::{Allegiance, EntityKind, Tick};

    fn agent(health: i32, ready: bool) -> SensingSnapshot {
        let mut snap =
            SensingSnapshot::new(EntityId(1), EntityKind::Ordinary, Tick(10), Position::new(5, 5));
        snap.health = health;
        snap.action_ready = ready;
        snap
    }

    fn hostile(id: u32, x: i32, y: i32) -> Entity {
        Entity::new(EntityId(id), Allegiance::Hostile, EntityKind::Ordinary, Position::new(x, y), 100)
    }

    #[test]
    fn wounded_agent_strikes_then_retreats_until_counter_empties() {
        let config = KiteConfig::default();
        let mut kite = KiteMachine::new();
        let snap = agent(50, true);
        let enemy = hostile(9, 5, 6);

        let action = kite.tick(&snap, &enemy, &config, |_| true);
        assert!(matches!(action, KiteAction::Attack { target: EntityId(9), .. }));
        assert_eq!(kite.state(), KiteState::Retreat);
        assert_eq!(kite.retreat_left(), config.wounded_retreat_steps);

        for _ in 0..config.wounded_retreat_steps {
            let action = kite.tick(&snap, &enemy, &config, |_| true);
            assert_eq!(action, KiteAction::Retreat(Direction::South));
        }
        assert_eq!(kite.retreat_left(), 0);
        assert!(matches!(
            kite.tick(&snap, &enemy, &config, |_| true),
            KiteAction::Attack { .. }
        ));
    }

    #[test]
    fn healthy_agent_keeps_attacking() {
        let config = KiteConfig::default();
        let mut kite = KiteMachine::new();
        let snap = agent(100, true);
        let enemy = hostile(9, 6, 6);
        for _ in 0..3 {
            assert!(matches!(
                kite.tick(&snap, &enemy, &config, |_| true),
                KiteAction::Attack { .. }
            ));
            assert_eq!(kite.state(), KiteState::Attack);
        }
    }

    #[test]
    fn distant_target_is_approached_and_cooldown_holds() {
        let config = KiteConfig::default();
        let mut kite = KiteMachine::new();
        let enemy = hostile(9, 9, 9);
        assert_eq!(
            kite.tick(&agent(100, true), &enemy, &config, |_| true),
            KiteAction::Approach(Position::new(9, 9))
        );
        assert_eq!(kite.state(), KiteState::Approach);

        let adjacent = hostile(9, 4, 4);
        assert_eq!(kite.tick(&agent(100, false), &adjacent, &config, |_| true), KiteAction::Hold);
        assert_eq!(kite.state(), KiteState::Attack);
    }

    #[test]
    fn new_target_clears_retreat_counter() {
        let config = KiteConfig::default();
        let mut kite = KiteMachine::new();
        let snap = agent(20, true);
        kite.tick(&snap, &hostile(9, 5, 6), &config, |_| true);
        assert_eq!(kite.retreat_left(), config.critical_retreat_steps);

        let action = kite.tick(&snap, &hostile(10, 6, 5), &config, |_| true);
        assert!(matches!(action, KiteAction::Attack { target: EntityId(10), .. }));
        assert_eq!(kite.target(), Some(EntityId(10)));
    }

    #[test]
    fn retreat_continues_after_contact_is_lost() {
        let config = KiteConfig::default();
        let mut kite = KiteMachine::new();
        let enemy = hostile(9, 5, 6);
        kite.tick(&agent(20, true), &enemy, &config, |_| true);
        assert_eq!(kite.retreat_left(), config.critical_retreat_steps);

        let mut away =
            SensingSnapshot::new(EntityId(1), EntityKind::Ordinary, Tick(11), Position::new(5, 3));
        away.health = 20;
        assert_eq!(
            kite.keep_retreating(&away, |_| true),
            Some(KiteAction::Retreat(Direction::South))
        );
        assert_eq!(kite.retreat_left(), config.critical_retreat_steps - 1);

        // Contact again with steps left: still no strike.
        assert_eq!(
            kite.tick(&agent(20, true), &enemy, &config, |_| true),
            KiteAction::Retreat(Direction::South)
        );
        kite.tick(&agent(20, true), &enemy, &config, |_| true);
        assert_eq!(kite.retreat_left(), 0);
        assert_eq!(kite.keep_retreating(&away, |_| true), None);
        assert!(matches!(
            kite.tick(&agent(20, true), &enemy, &config, |_| true),
            KiteAction::Attack { .. }
        ));
    }

    #[test]
    fn cornered_retreat_holds_but_spends_steps() {
        let config = KiteConfig::default();
        let mut kite = KiteMachine::new();
        let snap = agent(50, true);
        let enemy = hostile(9, 5, 6);
        kite.tick(&snap, &enemy, &config, |_| false);
        assert_eq!(kite.tick(&snap, &enemy, &config, |_| false), KiteAction::Hold);
        assert_eq!(kite.retreat_left(), config.wounded_retreat_steps - 1);
    }

    #[test]
    fn retreat_length_scales_inversely_with_health() {
        let config = KiteConfig::default();
        assert_eq!(retreat_steps(100, &config), 0);
        assert_eq!(retreat_steps(70, &config), 1);
        assert_eq!(retreat_steps(50, &config), 2);
        assert_eq!(retreat_steps(10, &config), 3);
    }
}
