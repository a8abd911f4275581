//! In-memory source snapshots and configuration for integration tests.

use rollcall::config::{RosterConfig, StatusGroupSetting, TeamSettings};
use rollcall::source::chat::{ChatProfile, ChatUser};
use rollcall::source::directory::{
    CustomField, DirectoryGroup, DirectoryMember, DirectorySnapshot, MemberStatus,
};
use rollcall::source::{MappingUser, SourceSet, WorkspaceUser, WorkspaceUserName};
use std::collections::BTreeMap;

pub const TEAM: &str = "ESAR";
pub const DOMAIN: &str = "kcesar.org";

fn status(title: &str, current: Option<bool>, trainee: Option<bool>) -> StatusGroupSetting {
    StatusGroupSetting {
        title: title.to_string(),
        current,
        trainee,
        mission: None,
        field: None,
    }
}

/// Team "ESAR" with "ESAR" as the member status group and "ESAR Trainees" as
/// the trainee status group. Secondary sources start disabled.
pub fn config() -> RosterConfig {
    let mut config = RosterConfig::default();
    config.team = TeamSettings {
        name: TEAM.to_string(),
        email_domain: DOMAIN.to_string(),
    };
    config.directory.status_groups = vec![
        status("ESAR", Some(true), None),
        status("ESAR Trainees", Some(false), Some(true)),
    ];
    config.workspace.enabled = false;
    config.chat.enabled = false;
    config.mapping.enabled = false;
    config
}

pub fn groups() -> Vec<DirectoryGroup> {
    vec![
        DirectoryGroup {
            id: 1,
            title: "ESAR".to_string(),
        },
        DirectoryGroup {
            id: 2,
            title: "ESAR Trainees".to_string(),
        },
        DirectoryGroup {
            id: 3,
            title: "ESAR Field".to_string(),
        },
    ]
}

/// Operational directory member with a valid join date.
pub fn directory_member(id: i64, name: &str, email: &str, group_ids: &[i64]) -> DirectoryMember {
    DirectoryMember {
        id,
        name: name.to_string(),
        email: Some(email.to_string()),
        position: String::new(),
        status: MemberStatus {
            kind: "custom".to_string(),
            value: "Operational".to_string(),
        },
        custom_fields: vec![CustomField {
            label: "Joined Unit Date".to_string(),
            value: Some(format!("{} 2018-09-01", TEAM)),
        }],
        group_ids: group_ids.to_vec(),
    }
}

pub fn directory(members: Vec<DirectoryMember>) -> DirectorySnapshot {
    DirectorySnapshot {
        groups: groups(),
        members,
        ..DirectorySnapshot::default()
    }
}

pub fn sources(members: Vec<DirectoryMember>) -> SourceSet {
    SourceSet {
        directory: directory(members),
        ..SourceSet::default()
    }
}

pub fn workspace_user(email: &str, full_name: &str) -> WorkspaceUser {
    let (given, family) = full_name.split_once(' ').unwrap_or((full_name, ""));
    WorkspaceUser {
        primary_email: email.to_string(),
        name: WorkspaceUserName {
            given_name: given.to_string(),
            family_name: family.to_string(),
            full_name: full_name.to_string(),
        },
        emails: Vec::new(),
        org_unit_path: "/Members".to_string(),
        archived: false,
        suspended: false,
        suspension_reason: None,
    }
}

pub fn chat_user(id: &str, email: Option<&str>, real_name: &str) -> ChatUser {
    ChatUser {
        id: id.to_string(),
        name: id.to_lowercase(),
        real_name: Some(real_name.to_string()),
        deleted: false,
        is_bot: false,
        profile: ChatProfile {
            email: email.map(str::to_string),
            real_name: None,
        },
    }
}

pub fn mapping_user(id: &str, name: Option<&str>, email: Option<&str>) -> MappingUser {
    MappingUser {
        id: id.to_string(),
        full_name: name.map(str::to_string),
        email: email.map(str::to_string),
        groups: BTreeMap::new(),
    }
}
