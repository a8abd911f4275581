//! Per-agent configuration sections.

use crate::model::{ExpectationType, TeamStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Organization-wide settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamSettings {
    /// Organization designation used in position/status text and group prefixes
    #[serde(default)]
    pub name: String,
    /// Domain of team email addresses, without the `@`
    #[serde(default)]
    pub email_domain: String,
}

/// Status derived from membership in one group.
///
/// Unset fields leave earlier matches alone; set fields override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusGroupSetting {
    pub title: String,
    #[serde(default)]
    pub current: Option<bool>,
    #[serde(default)]
    pub trainee: Option<bool>,
    #[serde(default)]
    pub mission: Option<bool>,
    #[serde(default)]
    pub field: Option<bool>,
}

impl StatusGroupSetting {
    pub fn apply_to(&self, status: &mut TeamStatus) {
        status.title = self.title.clone();
        if let Some(current) = self.current {
            status.current = current;
        }
        if let Some(trainee) = self.trainee {
            status.trainee = trainee;
        }
        if let Some(mission) = self.mission {
            status.mission = mission;
        }
        if let Some(field) = self.field {
            status.field = field;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectationSetting {
    /// Qualification title, matched against the catalog ignoring case
    pub course: String,
    #[serde(default, rename = "type")]
    pub check: ExpectationType,
}

fn default_secondary_email_field() -> String {
    "Secondary Email".to_string()
}

fn default_unit_status_field() -> String {
    "Unit Status".to_string()
}

fn default_join_date_field() -> String {
    "Joined Unit Date".to_string()
}

fn default_true() -> bool {
    true
}

/// Authoritative membership source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySettings {
    /// Groups whose title matches this regex are left out of the model
    #[serde(default)]
    pub exclude_groups: Option<String>,

    #[serde(default = "default_secondary_email_field")]
    pub secondary_email_field: String,

    #[serde(default = "default_unit_status_field")]
    pub unit_status_field: String,

    #[serde(default = "default_join_date_field")]
    pub join_date_field: String,

    /// Applied in order; later matches override earlier ones
    #[serde(default)]
    pub status_groups: Vec<StatusGroupSetting>,

    /// Group title to expected qualifications
    #[serde(default)]
    pub expectations: BTreeMap<String, Vec<ExpectationSetting>>,

    /// Group title to emails allowed to stay in the group as non-members
    #[serde(default)]
    pub add_group_members: BTreeMap<String, Vec<String>>,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            exclude_groups: None,
            secondary_email_field: default_secondary_email_field(),
            unit_status_field: default_unit_status_field(),
            join_date_field: default_join_date_field(),
            status_groups: Vec::new(),
            expectations: BTreeMap::new(),
            add_group_members: BTreeMap::new(),
        }
    }
}

/// Mailing group on the account directory service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceGroupSetting {
    pub title: String,
    pub email: String,
    /// Canonical group titles whose members belong in this mailing group
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub sync: bool,
}

fn default_org_units() -> Vec<String> {
    vec!["/Members".to_string(), "/Trainees".to_string()]
}

/// Account directory service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Only accounts in these org units are linked
    #[serde(default = "default_org_units")]
    pub org_units: Vec<String>,
    #[serde(default)]
    pub ignore_users: Vec<String>,
    #[serde(default)]
    pub alias_emails: BTreeMap<String, String>,
    /// Merge the account's addresses into a matched member's emails
    #[serde(default)]
    pub contribute_emails: bool,
    #[serde(default)]
    pub groups: Vec<WorkspaceGroupSetting>,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            org_units: default_org_units(),
            ignore_users: Vec::new(),
            alias_emails: BTreeMap::new(),
            contribute_emails: false,
            groups: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSetting {
    /// Normalized channel name
    pub chat: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub sync: bool,
}

/// Chat platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub channels: Vec<ChannelSetting>,
    #[serde(default)]
    pub alias_emails: BTreeMap<String, String>,
    #[serde(default)]
    pub contribute_emails: bool,
    /// Flag current members without a chat account
    #[serde(default)]
    pub require_account: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            channels: Vec::new(),
            alias_emails: BTreeMap::new(),
            contribute_emails: false,
            require_account: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingTeamSetting {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub allow_members: bool,
    #[serde(default)]
    pub allow_external: bool,
    #[serde(default)]
    pub expect_groups: Vec<String>,
    #[serde(default)]
    pub min_permission: Option<u32>,
}

/// Mapping/collaboration platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub teams: Vec<MappingTeamSetting>,
    /// Emails expected in every team regardless of groups
    #[serde(default)]
    pub extra_members: Vec<String>,
    #[serde(default)]
    pub alias_emails: BTreeMap<String, String>,
}

impl Default for MappingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            teams: Vec::new(),
            extra_members: Vec::new(),
            alias_emails: BTreeMap::new(),
        }
    }
}

/// Snapshot cache location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Snapshot directory; None means the platform cache directory
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_status_groups_override_set_fields_only() {
        let mut status = TeamStatus::default();
        StatusGroupSetting {
            title: "ESAR".to_string(),
            current: Some(true),
            trainee: None,
            mission: Some(true),
            field: None,
        }
        .apply_to(&mut status);
        StatusGroupSetting {
            title: "ESAR Support".to_string(),
            current: None,
            trainee: None,
            mission: Some(false),
            field: Some(false),
        }
        .apply_to(&mut status);

        assert_eq!(status.title, "ESAR Support");
        assert!(status.current);
        assert!(!status.mission);
        assert!(!status.field);
    }
}
