//! Configuration
//!
//! Typed, already-parsed settings for every agent. Loaded by [`ConfigLoader`]
//! from defaults, an optional global file, an explicit file and the environment;
//! the reconciliation core only ever reads the resulting [`RosterConfig`].

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sections;
pub mod sources;

pub use facade::ConfigLoader;
pub use sections::{
    CacheConfig, ChannelSetting, ChatSettings, DirectorySettings, ExpectationSetting,
    MappingSettings, MappingTeamSetting, StatusGroupSetting, TeamSettings, WorkspaceGroupSetting,
    WorkspaceSettings,
};

use crate::error::RosterError;
use crate::logging::LoggingConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub team: TeamSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
    #[serde(default)]
    pub workspace: WorkspaceSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub mapping: MappingSettings,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RosterConfig {
    /// Validate settings that serde cannot check on its own.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.team.name.trim().is_empty() {
            return Err(RosterError::ConfigError(
                "team.name cannot be empty".to_string(),
            ));
        }
        let domain = self.team.email_domain.trim();
        if domain.is_empty() || domain.contains('@') {
            return Err(RosterError::ConfigError(format!(
                "team.email_domain must be a bare domain, got '{}'",
                self.team.email_domain
            )));
        }

        if let Some(pattern) = &self.directory.exclude_groups {
            Regex::new(pattern).map_err(|cause| RosterError::InvalidPattern {
                setting: "directory.exclude_groups".to_string(),
                cause,
            })?;
        }

        for (group, expectations) in &self.directory.expectations {
            if expectations.iter().any(|e| e.course.trim().is_empty()) {
                return Err(RosterError::ConfigError(format!(
                    "Expectation for group '{}' has an empty course",
                    group
                )));
            }
        }

        for group in &self.workspace.groups {
            if !group.email.contains('@') {
                return Err(RosterError::ConfigError(format!(
                    "Workspace group '{}' has invalid email '{}'",
                    group.title, group.email
                )));
            }
        }

        if let Some(channel) = self.chat.channels.iter().find(|c| c.chat.trim().is_empty()) {
            return Err(RosterError::ConfigError(format!(
                "Chat channel setting for groups {:?} has an empty channel name",
                channel.groups
            )));
        }

        if let Some(team) = self.mapping.teams.iter().find(|t| t.id.trim().is_empty()) {
            return Err(RosterError::ConfigError(format!(
                "Mapping team '{}' has an empty id",
                team.name
            )));
        }

        Ok(())
    }
}
