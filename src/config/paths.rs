//! Platform-specific locations for config, cache and log files.

use crate::error::RosterError;
use directories::ProjectDirs;
use std::path::PathBuf;

const APPLICATION: &str = "rollcall";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
}

/// `<config dir>/rollcall/config.toml`, if a home directory can be determined
pub fn global_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default directory for source snapshots.
pub fn default_cache_dir() -> Result<PathBuf, RosterError> {
    project_dirs()
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .ok_or_else(|| {
            RosterError::ConfigError(
                "Could not determine cache directory (HOME not set)".to_string(),
            )
        })
}

/// Default log file location; falls back to the data directory where
/// the platform has no separate state directory.
pub fn default_log_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| {
        dirs.state_dir()
            .unwrap_or_else(|| dirs.data_local_dir())
            .join("rollcall.log")
    })
}
