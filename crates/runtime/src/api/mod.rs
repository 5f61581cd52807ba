//! Public runtime API surface.
//!
//! This module gathers the types a host implements or consumes so the rest of
//! the crate can stay focused on orchestration.

pub mod errors;
pub mod host;

pub use errors::{ActionError, ActionKind, ChannelError, Result, RuntimeError};
pub use host::{Actuator, ChannelIo, InteractOutcome, InteractTarget, MessageBatch};
