//! ConfigLoader facade delegating to merge service.

use super::merge::MergeService;
use super::{paths, RosterConfig};
use crate::error::RosterError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from the global file, `explicit`
    /// when given, and the environment.
    pub fn load(explicit: Option<&Path>) -> Result<RosterConfig, RosterError> {
        let config = MergeService::load(explicit)?;
        config.validate()?;
        debug!(team = %config.team.name, "Configuration loaded");
        Ok(config)
    }

    /// Load and validate configuration without an explicit file.
    pub fn load_default() -> Result<RosterConfig, RosterError> {
        Self::load(None)
    }

    /// Load and validate configuration from a specific file only.
    pub fn load_from_file(path: &Path) -> Result<RosterConfig, RosterError> {
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Snapshot directory: the configured one, else the platform cache directory.
    pub fn cache_dir(config: &RosterConfig) -> Result<PathBuf, RosterError> {
        match &config.cache.dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::default_cache_dir(),
        }
    }
}
