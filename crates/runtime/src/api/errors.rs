//! Unified error types surfaced by the runtime API.
//!
//! Host-side failures (closed capability gates, rejected writes) are ordinary
//! negative results: the orchestrator logs them and falls through to the next
//! priority. Only construction-time problems surface as [`RuntimeError`].
use agent_core::{AgentError, CodecError, ErrorSeverity, Position};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("invalid role split: guardian {guardian}% must not exceed flex {flex}%")]
    InvalidRoleSplit { guardian: u32, flex: u32 },

    #[error("arena {width}x{height} cannot be addressed by the shared channel")]
    ArenaTooLarge { width: i32, height: i32 },

    #[error("unknown tuning profile `{name}`")]
    UnknownProfile { name: String },

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

impl AgentError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidRoleSplit { .. }
            | Self::ArenaTooLarge { .. }
            | Self::UnknownProfile { .. } => ErrorSeverity::Validation,
            Self::Channel(e) => e.severity(),
            Self::Action(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRoleSplit { .. } => "RUNTIME_INVALID_ROLE_SPLIT",
            Self::ArenaTooLarge { .. } => "RUNTIME_ARENA_TOO_LARGE",
            Self::UnknownProfile { .. } => "RUNTIME_UNKNOWN_PROFILE",
            Self::Channel(e) => e.error_code(),
            Self::Action(e) => e.error_code(),
        }
    }
}

/// Actuation primitive an [`ActionError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Move,
    Turn,
    Interact,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{action} is on cooldown")]
    NotReady { action: ActionKind },

    #[error("cell {position} is blocked")]
    Blocked { position: Position },

    #[error("interaction target at {position} is out of range")]
    OutOfRange { position: Position },

    #[error("host rejected {action}: {reason}")]
    Rejected {
        action: ActionKind,
        reason: &'static str,
    },
}

impl AgentError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotReady { .. } | Self::Blocked { .. } | Self::OutOfRange { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::Rejected { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotReady { .. } => "ACTION_NOT_READY",
            Self::Blocked { .. } => "ACTION_BLOCKED",
            Self::OutOfRange { .. } => "ACTION_OUT_OF_RANGE",
            Self::Rejected { .. } => "ACTION_REJECTED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("agent is not allowed to write slot {index}")]
    NotWriter { index: usize },

    #[error("slot index {index} is outside the channel")]
    IndexOutOfRange { index: usize },

    #[error("broadcast of {bits:#010x} was dropped by the host")]
    BroadcastDropped { bits: u32 },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl AgentError for ChannelError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotWriter { .. } | Self::BroadcastDropped { .. } => ErrorSeverity::Recoverable,
            Self::IndexOutOfRange { .. } => ErrorSeverity::Internal,
            Self::Codec(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotWriter { .. } => "CHANNEL_NOT_WRITER",
            Self::IndexOutOfRange { .. } => "CHANNEL_INDEX_OUT_OF_RANGE",
            Self::BroadcastDropped { .. } => "CHANNEL_BROADCAST_DROPPED",
            Self::Codec(e) => e.error_code(),
        }
    }
}
