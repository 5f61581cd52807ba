//! Host-facing abstractions for actuation and the shared channel.
//!
//! A host (game engine binding, simulator, test arena) implements
//! [`Actuator`] and [`ChannelIo`] for the agent currently being ticked. Every
//! `try_*` call is preceded by the matching `can_*` predicate; the host
//! enforces cooldowns and the runtime never assumes them away.
use agent_core::{AgentConfig, Direction, EntityId, Position};
use arrayvec::ArrayVec;

use super::errors::{ActionError, ChannelError};

/// Raw broadcast words received this tick, newest last.
pub type MessageBatch = ArrayVec<u32, { AgentConfig::MAX_MESSAGES }>;

/// Something an agent can interact with: attack, hand resources to, collect from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractTarget {
    Entity { id: EntityId, position: Position },
    Cell(Position),
}

impl InteractTarget {
    pub fn position(&self) -> Position {
        match *self {
            Self::Entity { position, .. } => position,
            Self::Cell(position) => position,
        }
    }
}

/// Result of a successful interaction as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractOutcome {
    /// The interaction destroyed the target entity.
    pub killed: bool,
    /// Resources moved by the interaction (collected or delivered).
    pub transferred: i32,
}

/// Capability-gated actuation primitives.
pub trait Actuator {
    fn can_move(&self, direction: Direction) -> bool;

    fn try_move(&mut self, direction: Direction) -> Result<(), ActionError>;

    fn can_turn(&self, direction: Direction) -> bool;

    fn try_turn(&mut self, direction: Direction) -> Result<(), ActionError>;

    fn can_interact(&self, target: &InteractTarget) -> bool;

    /// Interacts with `target`, optionally spending team resources.
    fn try_interact(
        &mut self,
        target: InteractTarget,
        spend: Option<i32>,
    ) -> Result<InteractOutcome, ActionError>;
}

/// Shared-channel primitives.
///
/// Reads never fail: unwritten slots read as `0`. Writes are gated by the
/// host (only leaders may write) and report rejection through
/// [`ChannelError`].
pub trait ChannelIo {
    fn read_slot(&self, index: usize) -> u16;

    fn write_slot(&mut self, index: usize, value: u16) -> Result<(), ChannelError>;

    /// Best-effort broadcast; delivery is not guaranteed.
    fn broadcast(&mut self, bits: u32) -> Result<(), ChannelError>;

    /// Up to `limit` messages broadcast since this agent's previous tick,
    /// oldest first.
    fn receive_recent(&self, limit: usize) -> MessageBatch;
}
