//! Snapshot Store
//!
//! File-backed snapshots of each source's cached data. One JSON document per
//! platform, `<dir>/<Platform>.json`, shaped `{ "timestamp": <ms>, "data": {...} }`.
//! Refreshing these files is the platform clients' job; this store only reads
//! them.

use super::{ChatSnapshot, DirectorySnapshot, MappingSnapshot, WorkspaceSnapshot};
use super::{CHAT, DIRECTORY, MAPPING, WORKSPACE};
use crate::config::RosterConfig;
use crate::error::RosterError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cached source data with the time it was fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSnapshot<T> {
    /// Milliseconds since the Unix epoch; 0 when never refreshed
    #[serde(default)]
    pub timestamp: i64,
    pub data: T,
}

/// Consistent set of source snapshots for one model build
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    pub directory: DirectorySnapshot,
    pub workspace: Option<WorkspaceSnapshot>,
    pub chat: Option<ChatSnapshot>,
    pub mapping: Option<MappingSnapshot>,
}

pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, platform: &str) -> PathBuf {
        self.dir.join(format!("{}.json", platform))
    }

    /// Load one platform's snapshot. A missing or undecodable file means the
    /// source is unavailable.
    pub fn load<T: DeserializeOwned>(&self, platform: &str) -> Result<SourceSnapshot<T>, RosterError> {
        let path = self.path_for(platform);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            RosterError::source_unavailable(
                platform,
                format!("failed to read {}: {}", path.display(), e),
            )
        })?;
        let snapshot: SourceSnapshot<T> = serde_json::from_str(&content).map_err(|e| {
            RosterError::source_unavailable(
                platform,
                format!("failed to decode {}: {}", path.display(), e),
            )
        })?;
        debug!(platform, timestamp = snapshot.timestamp, "Loaded source snapshot");
        Ok(snapshot)
    }

    #[cfg(test)]
    pub fn save<T: Serialize>(
        &self,
        platform: &str,
        snapshot: &SourceSnapshot<T>,
    ) -> Result<(), RosterError> {
        std::fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(self.path_for(platform), content)?;
        Ok(())
    }

    /// Load the directory snapshot plus every enabled secondary source.
    ///
    /// Fails as a whole if any enabled source is unavailable: no partial model is
    /// built from an incomplete set.
    pub fn load_set(&self, config: &RosterConfig) -> Result<SourceSet, RosterError> {
        let directory = self.load::<DirectorySnapshot>(DIRECTORY)?.data;
        let workspace = if config.workspace.enabled {
            Some(self.load::<WorkspaceSnapshot>(WORKSPACE)?.data)
        } else {
            None
        };
        let chat = if config.chat.enabled {
            Some(self.load::<ChatSnapshot>(CHAT)?.data)
        } else {
            None
        };
        let mapping = if config.mapping.enabled {
            Some(self.load::<MappingSnapshot>(MAPPING)?.data)
        } else {
            None
        };
        Ok(SourceSet {
            directory,
            workspace,
            chat,
            mapping,
        })
    }
}
