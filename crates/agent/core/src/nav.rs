//! Bug navigation with wall-following and a hazard overlay.
//!
//! [`BugNavigator::step`] returns exactly one direction per call. The caller
//! performs the move; the navigator assumes it happened and updates its own
//! state as the final step of each branch, so a tick cut short by the host
//! never leaves it half-updated.
//!
//! Destinations that are fully enclosed are not detected: the navigator keeps
//! sweeping and relies on the caller re-selecting a target every tick.

use crate::config::NavConfig;
use crate::grid::{Direction, HazardMask, Position};

/// Per-agent navigator state.
///
/// Reset whenever the destination changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BugNavigator {
    destination: Option<Position>,
    following: bool,
    follow_dir: Direction,
    baseline_pos: Position,
    baseline_dist: i32,
    clockwise: bool,
    charge_anchor: Option<Position>,
}

impl BugNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or clears) the high-value fixed target near which hazards are ignored.
    pub fn set_charge_anchor(&mut self, anchor: Option<Position>) {
        self.charge_anchor = anchor;
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn destination(&self) -> Option<Position> {
        self.destination
    }

    /// Clears wall-following state and forgets the destination.
    pub fn reset(&mut self) {
        self.destination = None;
        self.following = false;
        self.follow_dir = Direction::Center;
    }

    /// True when `from` lies inside the charge radius of the anchor.
    pub fn is_charging(&self, from: Position, config: &NavConfig) -> bool {
        self.charge_anchor
            .is_some_and(|anchor| from.distance_sq(anchor) <= config.charge_radius_sq)
    }

    /// Chooses the next step from `from` toward `to`.
    ///
    /// # Arguments
    ///
    /// * `hazards` - neighbours to avoid this tick (ignored while charging)
    /// * `passable` - host movement check for a direction (terrain, occupancy)
    ///
    /// # Returns
    ///
    /// `Direction::Center` when already at `to` or when every neighbour is
    /// blocked; otherwise the first viable direction in sweep order.
    pub fn step<F>(
        &mut self,
        from: Position,
        to: Position,
        hazards: HazardMask,
        config: &NavConfig,
        mut passable: F,
    ) -> Direction
    where
        F: FnMut(Direction) -> bool,
    {
        if from == to {
            self.following = false;
            return Direction::Center;
        }
        if self.destination != Some(to) {
            self.reset();
            self.destination = Some(to);
            self.clockwise = config.rotation.is_clockwise(to);
        }

        let mask = if self.is_charging(from, config) {
            HazardMask::empty()
        } else {
            hazards
        };
        let mut viable = |dir: Direction| !mask.is_hazardous(dir) && passable(dir);

        let direct = Direction::toward(from, to);
        let dist = from.distance_sq(to);

        if self.following
            && dist < self.baseline_dist
            && from != self.baseline_pos
            && viable(direct)
        {
            self.following = false;
            return direct;
        }

        if !self.following {
            for dir in [direct, direct.rotate_left(), direct.rotate_right()] {
                if viable(dir) {
                    return dir;
                }
            }
            self.following = true;
            self.follow_dir = direct;
            self.baseline_pos = from;
            self.baseline_dist = dist;
        }

        let mut dir = self.follow_dir;
        for _ in 0..Direction::ALL.len() {
            if viable(dir) {
                // Next sweep starts pointing back into the wall.
                self.follow_dir = self.toward_wall(dir);
                return dir;
            }
            dir = self.advance(dir);
        }
        self.follow_dir = self.advance(self.follow_dir);
        Direction::Center
    }

    #[inline]
    fn advance(&self, dir: Direction) -> Direction {
        if self.clockwise {
            dir.rotate_right()
        } else {
            dir.rotate_left()
        }
    }

    #[inline]
    fn toward_wall(&self, dir: Direction) -> Direction {
        if self.clockwise {
            dir.rotate_left().rotate_left()
        } else {
            dir.rotate_right().rotate_right()
        }
    }
}

/// One step directly away from `threat`, trying the two neighbouring
/// directions when the straight retreat is blocked.
pub fn flee_step<F>(from: Position, threat: Position, hazards: HazardMask, mut passable: F) -> Direction
where
    F: FnMut(Direction) -> bool,
{
    let away = Direction::toward(threat, from);
    let away = if away.is_center() { Direction::North } else { away };
    [away, away.rotate_left(), away.rotate_right()]
        .into_iter()
        .find(|&dir| !hazards.is_hazardous(dir) && passable(dir))
        .unwrap_or(Direction::Center)
}
