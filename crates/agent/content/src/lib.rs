//! Data-driven tuning for the agent decision core.
//!
//! This crate houses the built-in tuning profiles and loaders for tuning data:
//! - Named tuning profiles (attack / defense / economy multipliers)
//! - Profile catalogs (data-driven via RON)
//! - Full agent configuration overrides (data-driven via TOML)
//!
//! Loaders deserialize straight into agent-core types; nothing here is
//! consulted once an [`agent_core::AgentConfig`] has been built.

pub mod presets;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use presets::Preset;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, ProfileCatalog, ProfileLoader};
