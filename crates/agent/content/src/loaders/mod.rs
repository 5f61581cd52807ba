//! Loaders for reading tuning data from files.
//!
//! Profiles come from RON catalogs, full configuration from TOML.

pub mod config;
pub mod profile;

pub use config::ConfigLoader;
pub use profile::{ProfileCatalog, ProfileLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
