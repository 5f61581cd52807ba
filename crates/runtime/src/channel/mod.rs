//! Agent-side access to the shared channel.
//!
//! - [`ChannelCache`] throttles slot reads by each slot's cadence
//! - [`SlotWriter`] suppresses redundant leader writes
//! - [`TeamView`] decodes everything a non-leader needs in one pass
mod cache;
mod view;
mod writer;

pub use cache::ChannelCache;
pub use view::{TeamView, sighting_cursor};
pub use writer::SlotWriter;
