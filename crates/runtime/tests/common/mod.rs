//! Small two-team grid used by the integration tests.
//!
//! The world plays host for every agent: it builds sensing snapshots,
//! enforces one move and one interaction per agent per tick, and keeps a
//! separate shared channel for each team.
#![allow(dead_code)]

use std::collections::HashMap;

use agent_core::{
    AgentConfig, Allegiance, Direction, Entity, EntityId, EntityKind, Position, ResourceCell,
    SensingSnapshot, Slot, SlotValue, Tick, decode,
};
use runtime::{
    ActionError, ActionKind, AgentRuntime, Actuator, ChannelError, ChannelIo, InteractOutcome,
    InteractTarget, MessageBatch, TickReport,
};

pub const TEAM_A: u8 = 0;
pub const TEAM_B: u8 = 1;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Copy, Debug)]
pub struct Body {
    pub id: EntityId,
    pub team: u8,
    pub kind: EntityKind,
    pub position: Position,
    pub facing: Direction,
    pub health: i32,
    pub carried: i32,
    /// Rooted bodies never get a movement-ready tick.
    pub rooted: bool,
}

#[derive(Debug)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub bodies: Vec<Body>,
    pub walls: Vec<Position>,
    pub resources: Vec<ResourceCell>,
    pub reserves: [i32; 2],
    pub sense_sq: i32,
    pub damage: i32,
}

#[derive(Debug)]
pub struct Radio {
    pub slots: [[u16; AgentConfig::SLOT_COUNT]; 2],
    pub log: Vec<(u8, u32)>,
    cursors: HashMap<EntityId, usize>,
}

#[derive(Debug)]
pub struct World {
    pub grid: Grid,
    pub radio: Radio,
    pub tick: u32,
}

impl World {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid: Grid {
                width,
                height,
                bodies: Vec::new(),
                walls: Vec::new(),
                resources: Vec::new(),
                reserves: [600, 600],
                sense_sq: 100,
                damage: 40,
            },
            radio: Radio {
                slots: [[0; AgentConfig::SLOT_COUNT]; 2],
                log: Vec::new(),
                cursors: HashMap::new(),
            },
            tick: 1,
        }
    }

    pub fn spawn(&mut self, id: u32, team: u8, kind: EntityKind, x: i32, y: i32, health: i32) {
        self.grid.bodies.push(Body {
            id: EntityId(id),
            team,
            kind,
            position: Position::new(x, y),
            facing: Direction::North,
            health,
            carried: 0,
            rooted: false,
        });
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.grid.bodies.iter().find(|b| b.id == EntityId(id))
    }

    pub fn body_mut(&mut self, id: u32) -> Option<&mut Body> {
        self.grid.bodies.iter_mut().find(|b| b.id == EntityId(id))
    }

    pub fn sense(&self, id: u32) -> Option<SensingSnapshot> {
        self.grid.sense(EntityId(id), Tick(self.tick))
    }

    /// Ticks one agent; `None` once the agent is gone.
    pub fn act(&mut self, runtime: &mut AgentRuntime, id: u32) -> Option<TickReport> {
        let snapshot = self.sense(id)?;
        let body = *self.body(id)?;
        let since = self.radio.cursors.get(&body.id).copied().unwrap_or(0);
        let mut hands = Hands {
            grid: &mut self.grid,
            id: body.id,
            moved: false,
            acted: false,
        };
        let mut link = Link {
            radio: &mut self.radio,
            team: body.team,
            writer: body.kind == EntityKind::Leader,
            since,
        };
        let report = runtime.tick(&snapshot, &mut hands, &mut link);
        let end = self.radio.log.len();
        self.radio.cursors.insert(body.id, end);
        Some(report)
    }

    /// Decoded slot contents as `team` sees them.
    pub fn slot(&self, team: u8, slot: Slot) -> SlotValue {
        decode(self.radio.slots[team as usize][slot.index()], slot.format())
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }
}

impl Grid {
    fn body(&self, id: EntityId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    fn sense(&self, id: EntityId, tick: Tick) -> Option<SensingSnapshot> {
        let me = self.body(id)?;
        let mut snap = SensingSnapshot::new(id, me.kind, tick, me.position);
        snap.facing = me.facing;
        snap.health = me.health;
        snap.carried = me.carried;
        snap.movement_ready = !me.rooted;
        snap.team_reserve = self.reserves[me.team as usize];
        for other in self.bodies.iter().filter(|b| b.id != id) {
            if other.position.distance_sq(me.position) > self.sense_sq {
                continue;
            }
            let allegiance = if other.team == me.team {
                Allegiance::Ally
            } else {
                Allegiance::Hostile
            };
            let entity = Entity::new(other.id, allegiance, other.kind, other.position, other.health)
                .carrying(other.carried);
            snap.push_entity(entity);
        }
        for cell in &self.resources {
            if cell.amount > 0 && cell.position.distance_sq(me.position) <= self.sense_sq {
                snap.push_resource(*cell);
            }
        }
        Some(snap)
    }

    fn free(&self, p: Position) -> bool {
        p.within(self.width, self.height)
            && !self.walls.contains(&p)
            && !self.bodies.iter().any(|b| b.position == p)
    }
}

/// Actuation for one agent during its tick.
pub struct Hands<'a> {
    grid: &'a mut Grid,
    id: EntityId,
    moved: bool,
    acted: bool,
}

impl Hands<'_> {
    fn here(&self) -> Position {
        self.grid.body(self.id).map_or(Position::ORIGIN, |b| b.position)
    }

    fn within_reach(&self, target: &InteractTarget) -> bool {
        let here = self.here();
        match *target {
            InteractTarget::Entity { id, .. } => self
                .grid
                .body(id)
                .is_some_and(|b| b.position.distance_sq(here) <= 2),
            InteractTarget::Cell(p) => {
                p.distance_sq(here) <= 2
                    && self.grid.resources.iter().any(|c| c.position == p && c.amount > 0)
            }
        }
    }
}

impl Actuator for Hands<'_> {
    fn can_move(&self, direction: Direction) -> bool {
        !self.moved && !direction.is_center() && self.grid.free(self.here().step(direction))
    }

    fn try_move(&mut self, direction: Direction) -> Result<(), ActionError> {
        if self.moved {
            return Err(ActionError::NotReady {
                action: ActionKind::Move,
            });
        }
        let to = self.here().step(direction);
        if !self.grid.free(to) {
            return Err(ActionError::Blocked { position: to });
        }
        if let Some(me) = self.grid.body_mut(self.id) {
            me.position = to;
        }
        self.moved = true;
        Ok(())
    }

    fn can_turn(&self, _direction: Direction) -> bool {
        true
    }

    fn try_turn(&mut self, direction: Direction) -> Result<(), ActionError> {
        if let Some(me) = self.grid.body_mut(self.id) {
            me.facing = direction;
        }
        Ok(())
    }

    fn can_interact(&self, target: &InteractTarget) -> bool {
        !self.acted && self.within_reach(target)
    }

    fn try_interact(
        &mut self,
        target: InteractTarget,
        spend: Option<i32>,
    ) -> Result<InteractOutcome, ActionError> {
        if !self.can_interact(&target) {
            return Err(ActionError::OutOfRange {
                position: target.position(),
            });
        }
        self.acted = true;
        let Some(me) = self.grid.body(self.id).copied() else {
            return Err(ActionError::Rejected {
                action: ActionKind::Interact,
                reason: "agent is gone",
            });
        };
        match target {
            InteractTarget::Cell(p) => {
                let mut taken = 0;
                if let Some(cell) = self.grid.resources.iter_mut().find(|c| c.position == p) {
                    taken = cell.amount.min(10);
                    cell.amount -= taken;
                }
                if let Some(me) = self.grid.body_mut(self.id) {
                    me.carried += taken;
                }
                Ok(InteractOutcome {
                    killed: false,
                    transferred: taken,
                })
            }
            InteractTarget::Entity { id, .. } => {
                let Some(other) = self.grid.body(id).copied() else {
                    return Err(ActionError::OutOfRange {
                        position: target.position(),
                    });
                };
                if other.team == me.team {
                    let amount = spend.unwrap_or(0).min(me.carried);
                    if let Some(me) = self.grid.body_mut(self.id) {
                        me.carried -= amount;
                    }
                    self.grid.reserves[me.team as usize] += amount;
                    return Ok(InteractOutcome {
                        killed: false,
                        transferred: amount,
                    });
                }
                let damage = self.grid.damage;
                let killed = match self.grid.body_mut(id) {
                    Some(victim) => {
                        victim.health -= damage;
                        victim.health <= 0
                    }
                    None => false,
                };
                if killed {
                    self.grid.bodies.retain(|b| b.id != id);
                }
                Ok(InteractOutcome {
                    killed,
                    transferred: 0,
                })
            }
        }
    }
}

/// Channel access for one agent during its tick.
pub struct Link<'a> {
    radio: &'a mut Radio,
    team: u8,
    writer: bool,
    since: usize,
}

impl ChannelIo for Link<'_> {
    fn read_slot(&self, index: usize) -> u16 {
        self.radio.slots[self.team as usize]
            .get(index)
            .copied()
            .unwrap_or(0)
    }

    fn write_slot(&mut self, index: usize, value: u16) -> Result<(), ChannelError> {
        if !self.writer {
            return Err(ChannelError::NotWriter { index });
        }
        let slot = self.radio.slots[self.team as usize]
            .get_mut(index)
            .ok_or(ChannelError::IndexOutOfRange { index })?;
        *slot = value;
        Ok(())
    }

    fn broadcast(&mut self, bits: u32) -> Result<(), ChannelError> {
        self.radio.log.push((self.team, bits));
        Ok(())
    }

    fn receive_recent(&self, limit: usize) -> MessageBatch {
        let heard: Vec<u32> = self.radio.log[self.since.min(self.radio.log.len())..]
            .iter()
            .filter(|(team, _)| *team == self.team)
            .map(|&(_, bits)| bits)
            .collect();
        let skip = heard.len().saturating_sub(limit.min(AgentConfig::MAX_MESSAGES));
        heard.into_iter().skip(skip).collect()
    }
}
