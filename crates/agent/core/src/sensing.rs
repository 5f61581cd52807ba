//! Per-tick sensing snapshot supplied by the host.
//!
//! Entities and resource cells are transient: the snapshot is rebuilt every
//! tick and never persisted. Lists are bounded so building a snapshot never
//! allocates.

use core::fmt;

use arrayvec::ArrayVec;

use crate::config::AgentConfig;
use crate::grid::{Direction, HazardMask, Position};

/// Unique identifier of an agent in the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation turn counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u32);

impl Tick {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Ticks elapsed since `earlier`, saturating at zero.
    #[inline]
    pub const fn since(self, earlier: Tick) -> u32 {
        self.0.saturating_sub(earlier.0)
    }

    /// True every `interval` ticks. An interval of 0 or 1 is always due.
    #[inline]
    pub const fn is_due(self, interval: u32) -> bool {
        interval <= 1 || self.0 % interval == 0
    }
}

impl core::ops::Add<u32> for Tick {
    type Output = Tick;
    fn add(self, rhs: u32) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Allegiance {
    Own,
    Ally,
    Hostile,
    /// Neutral but dangerous (e.g. a roaming predator).
    Hazard,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Ordinary,
    Leader,
    Hazard,
}

/// An observed agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub allegiance: Allegiance,
    pub kind: EntityKind,
    pub position: Position,
    pub health: i32,
    pub carried: i32,
}

impl Entity {
    pub const fn new(
        id: EntityId,
        allegiance: Allegiance,
        kind: EntityKind,
        position: Position,
        health: i32,
    ) -> Self {
        Self {
            id,
            allegiance,
            kind,
            position,
            health,
            carried: 0,
        }
    }

    #[must_use]
    pub const fn carrying(mut self, amount: i32) -> Self {
        self.carried = amount;
        self
    }

    #[inline]
    pub const fn is_hostile(&self) -> bool {
        matches!(self.allegiance, Allegiance::Hostile)
    }

    #[inline]
    pub const fn is_friendly(&self) -> bool {
        matches!(self.allegiance, Allegiance::Own | Allegiance::Ally)
    }

    #[inline]
    pub const fn is_leader(&self) -> bool {
        matches!(self.kind, EntityKind::Leader)
    }

    #[inline]
    pub const fn is_carrying(&self) -> bool {
        self.carried > 0
    }
}

/// A nearby interactable cell holding resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceCell {
    pub position: Position,
    pub amount: i32,
}

pub type EntityList = ArrayVec<Entity, { AgentConfig::MAX_SENSED_ENTITIES }>;
pub type ResourceList = ArrayVec<ResourceCell, { AgentConfig::MAX_RESOURCE_CELLS }>;

/// Everything the agent perceives this tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensingSnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub tick: Tick,
    pub position: Position,
    pub facing: Direction,
    pub health: i32,
    pub carried: i32,
    /// Team-wide resource reserve reported by the economy layer.
    pub team_reserve: i32,
    pub action_ready: bool,
    pub movement_ready: bool,
    pub hazards: HazardMask,
    pub entities: EntityList,
    pub resources: ResourceList,
}

impl SensingSnapshot {
    pub fn new(id: EntityId, kind: EntityKind, tick: Tick, position: Position) -> Self {
        Self {
            id,
            kind,
            tick,
            position,
            facing: Direction::North,
            health: 100,
            carried: 0,
            team_reserve: 0,
            action_ready: true,
            movement_ready: true,
            hazards: HazardMask::empty(),
            entities: EntityList::new(),
            resources: ResourceList::new(),
        }
    }

    /// Adds an entity, returning `false` once the list is full.
    pub fn push_entity(&mut self, entity: Entity) -> bool {
        self.entities.try_push(entity).is_ok()
    }

    /// Adds a resource cell, returning `false` once the list is full.
    pub fn push_resource(&mut self, cell: ResourceCell) -> bool {
        self.resources.try_push(cell).is_ok()
    }

    pub fn hostiles(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_hostile())
    }

    pub fn allies(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_friendly())
    }

    pub fn hostile_leader(&self) -> Option<&Entity> {
        self.hostiles().find(|e| e.is_leader())
    }

    pub fn own_leader(&self) -> Option<&Entity> {
        self.allies().find(|e| e.is_leader())
    }

    pub fn hostile_by_id(&self, id: EntityId) -> Option<&Entity> {
        self.hostiles().find(|e| e.id == id)
    }

    /// Closest hostile, ties broken by sensing order.
    pub fn nearest_hostile(&self) -> Option<&Entity> {
        let here = self.position;
        self.hostiles()
            .fold(None, |best: Option<&Entity>, e| match best {
                Some(b) if b.position.distance_sq(here) <= e.position.distance_sq(here) => Some(b),
                _ => Some(e),
            })
    }

    /// Number of hostiles within `radius_sq` of `center`.
    pub fn hostiles_within(&self, center: Position, radius_sq: i32) -> i32 {
        self.hostiles()
            .filter(|e| e.position.distance_sq(center) <= radius_sq)
            .count() as i32
    }

    /// Number of friendly agents adjacent to `target`.
    pub fn allies_adjacent_to(&self, target: Position) -> i32 {
        self.allies()
            .filter(|e| e.position.is_adjacent(target))
            .count() as i32
    }

    #[inline]
    pub const fn is_leader(&self) -> bool {
        matches!(self.kind, EntityKind::Leader)
    }

    #[inline]
    pub const fn is_carrying(&self) -> bool {
        self.carried > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SensingSnapshot {
        SensingSnapshot::new(EntityId(7), EntityKind::Ordinary, Tick(12), Position::new(5, 5))
    }

    #[test]
    fn filters_by_allegiance() {
        let mut snap = snapshot();
        snap.push_entity(Entity::new(
            EntityId(1),
            Allegiance::Hostile,
            EntityKind::Ordinary,
            Position::new(7, 5),
            50,
        ));
        snap.push_entity(Entity::new(
            EntityId(2),
            Allegiance::Ally,
            EntityKind::Leader,
            Position::new(4, 4),
            400,
        ));
        snap.push_entity(Entity::new(
            EntityId(3),
            Allegiance::Hostile,
            EntityKind::Leader,
            Position::new(9, 9),
            300,
        ));

        assert_eq!(snap.hostiles().count(), 2);
        assert_eq!(snap.own_leader().map(|e| e.id), Some(EntityId(2)));
        assert_eq!(snap.hostile_leader().map(|e| e.id), Some(EntityId(3)));
        assert_eq!(snap.nearest_hostile().map(|e| e.id), Some(EntityId(1)));
        assert_eq!(snap.hostiles_within(Position::new(5, 5), 4), 1);
    }

    #[test]
    fn entity_list_is_bounded() {
        let mut snap = snapshot();
        for i in 0..AgentConfig::MAX_SENSED_ENTITIES as u32 {
            assert!(snap.push_entity(Entity::new(
                EntityId(i),
                Allegiance::Hostile,
                EntityKind::Ordinary,
                Position::new(i as i32, 0),
                10,
            )));
        }
        assert!(!snap.push_entity(Entity::new(
            EntityId(999),
            Allegiance::Hostile,
            EntityKind::Ordinary,
            Position::ORIGIN,
            10,
        )));
    }

    #[test]
    fn tick_intervals() {
        assert!(Tick(9).is_due(3));
        assert!(!Tick(10).is_due(3));
        assert!(Tick(7).is_due(0));
        assert_eq!(Tick(10).since(Tick(4)), 6);
        assert_eq!(Tick(4).since(Tick(10)), 0);
    }
}
