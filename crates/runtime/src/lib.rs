//! Per-agent decision runtime for cooperative grid teams.
//!
//! This crate wires the pure decision core in `agent-core` to a host: it
//! reads the shared channel, runs leader duty, plans by role, and drives the
//! host's capability-gated actuation. Hosts embed one [`AgentRuntime`] per
//! agent and call [`AgentRuntime::tick`] once per game tick.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the tick orchestrator and builder
//! - [`api`] exposes the traits and errors a host deals with
//! - [`channel`] caches, decodes and writes the shared slot channel
//! - [`roles`] classifies agents and plans per role, including leader duty
//! - [`priority`] and [`movement`] turn a plan into actions
pub mod api;
pub mod channel;
pub mod config;
pub mod context;
pub mod movement;
pub mod priority;
pub mod report;
pub mod roles;
pub mod runtime;

pub use api::{
    ActionError, ActionKind, Actuator, ChannelError, ChannelIo, InteractOutcome, InteractTarget,
    MessageBatch, Result, RuntimeError,
};
pub use channel::{ChannelCache, SlotWriter, TeamView};
pub use config::{Arena, RuntimeConfig};
pub use context::AgentContext;
pub use movement::MoveIntent;
pub use priority::ActionTaken;
pub use report::Reporter;
pub use roles::{LeaderReport, LeaderState, Plan, Role, Specialty};
pub use runtime::{AgentRuntime, RuntimeBuilder, TickReport};
