//! Agent configuration loader.

use std::path::Path;

use agent_core::AgentConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for agent configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing AgentConfig overrides
    ///
    /// # Returns
    ///
    /// Returns an AgentConfig; tables and keys missing from the file keep
    /// their defaults.
    pub fn load(path: &Path) -> LoadResult<AgentConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML at {}: {}", path.display(), e))
    }

    /// Parse config overrides from TOML text.
    pub fn parse(content: &str) -> LoadResult<AgentConfig> {
        let config: AgentConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }

    /// The configuration bundled with the crate.
    pub fn builtin() -> LoadResult<AgentConfig> {
        Self::parse(include_str!("../../data/agent.toml"))
    }
}
