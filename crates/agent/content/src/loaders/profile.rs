//! Tuning profile catalog loader.
//!
//! Loads named tuning profiles from RON files.

use std::collections::HashMap;
use std::path::Path;

use agent_core::TuningProfile;

use crate::loaders::{LoadResult, read_file};
use crate::presets::Preset;

/// Named profiles read from a catalog file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileCatalog {
    profiles: HashMap<String, TuningProfile>,
}

impl ProfileCatalog {
    /// Looks a profile up by name, falling back to the built-in presets.
    pub fn get(&self, name: &str) -> Option<TuningProfile> {
        self.profiles
            .get(name)
            .copied()
            .or_else(|| name.parse::<Preset>().ok().map(Preset::profile))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

/// Loader for tuning profile catalogs.
pub struct ProfileLoader;

impl ProfileLoader {
    /// Loads a catalog file.
    ///
    /// File format: HashMap<String, TuningProfile>
    ///
    /// Example:
    /// ```ron
    /// {
    ///     "rush": (attack: 180, defense: 50, economy: 60),
    ///     "careful": (attack: 90, defense: 140, economy: 110),
    /// }
    /// ```
    pub fn load(path: &Path) -> LoadResult<ProfileCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse profile RON at {:?}: {}", path, e))
    }

    pub fn parse(content: &str) -> LoadResult<ProfileCatalog> {
        let profiles: HashMap<String, TuningProfile> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse profile RON: {}", e))?;

        Ok(ProfileCatalog { profiles })
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> LoadResult<ProfileCatalog> {
        Self::parse(include_str!("../../data/profiles.ron"))
    }
}
