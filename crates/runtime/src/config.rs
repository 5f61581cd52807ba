//! Runtime configuration: decision tuning plus the arena the agent lives in.
use agent_core::{AgentConfig, Position, channel::MAX_HALVED_COORD};

use crate::api::{Result, RuntimeError};

/// Playable area. Used for exploration targets when nothing better is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
}

impl Arena {
    /// Largest side the halved-coordinate slots can address.
    pub const MAX_SIDE: i32 = MAX_HALVED_COORD + 1;

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    /// Center of quadrant `index % 4`, row-major from the origin corner.
    pub const fn quadrant(&self, index: u32) -> Position {
        let (qx, qy) = match index % 4 {
            0 => (1, 1),
            1 => (3, 1),
            2 => (1, 3),
            _ => (3, 3),
        };
        Position::new(self.width * qx / 4, self.height * qy / 4)
    }

    pub fn clamp(&self, p: Position) -> Position {
        Position::new(p.x.clamp(0, self.width - 1), p.y.clamp(0, self.height - 1))
    }

    fn validate(&self) -> Result<()> {
        let fits = |side: i32| (1..=Self::MAX_SIDE).contains(&side);
        if fits(self.width) && fits(self.height) {
            Ok(())
        } else {
            Err(RuntimeError::ArenaTooLarge {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(Self::MAX_SIDE, Self::MAX_SIDE)
    }
}

/// Runtime configuration shared by every per-tick phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub agent: AgentConfig,
    pub arena: Arena,
}

impl RuntimeConfig {
    /// Rejects settings no agent could act on.
    pub fn validate(&self) -> Result<()> {
        let roles = &self.agent.roles;
        if roles.guardian_percent > roles.flex_percent || roles.flex_percent > 100 {
            return Err(RuntimeError::InvalidRoleSplit {
                guardian: roles.guardian_percent,
                flex: roles.flex_percent,
            });
        }
        self.arena.validate()
    }
}
