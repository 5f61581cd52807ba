//! Deterministic decision core for cooperative grid agents.
//!
//! `agent-core` turns one [`SensingSnapshot`] plus whatever the team has
//! published on the shared channel into a single decision per tick. Nothing
//! here performs I/O, logs, allocates on hot paths, or draws randomness; the
//! runtime crate wires these pieces to a host.
pub mod channel;
pub mod config;
pub mod error;
pub mod grid;
pub mod kite;
pub mod nav;
pub mod sensing;
pub mod strategy;
pub mod value;

pub use channel::{
    CodecError, Message, ReadCadence, Slot, SlotFormat, SlotSpec, SlotValue, Staleness, age_of,
    decode, encode, encode_saturating, is_fresh, stamp_of,
};
pub use config::{
    AgentConfig, ChannelConfig, CommitmentConfig, KiteConfig, NavConfig, OpponentConfig,
    RoleConfig, RotationSense, StateThresholds, TuningProfile, ValueConfig, WindowConfig,
};
pub use error::{AgentError, ErrorSeverity};
pub use grid::{Direction, HazardMask, Position};
pub use kite::{KiteAction, KiteMachine, KiteState};
pub use nav::{BugNavigator, flee_step};
pub use sensing::{
    Allegiance, Entity, EntityId, EntityKind, EntityList, ResourceCell, ResourceList,
    SensingSnapshot, Tick,
};
pub use strategy::{
    AttackWindow, Commitment, GameState, OpponentKind, PostRushPhase, StrategyController,
    StrategyUpdate, TeamAggregates,
};
pub use value::{
    Candidate, CandidateList, Fallback, Objective, ObjectiveKind, Situation, Weights,
    gather_candidates, select_target,
};
