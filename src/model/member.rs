//! Canonical team member records.

use super::group::TeamGroup;
use crate::source::{
    ChatAccount, DirectoryMember, MappingUser, PlatformRecord, WorkspaceUser, CHAT, DIRECTORY,
    MAPPING, WORKSPACE,
};
use crate::util::email_key;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

const TEMPLATE_FIRST: &str = "Unknown";
const TEMPLATE_LAST: &str = "User";

/// Structured name, derived once from the authoritative source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberName {
    pub first: String,
    pub last: String,
    /// "Last, First" display form
    pub last_first: String,
    pub preferred: String,
    pub preferred_full: String,
}

impl MemberName {
    /// Placeholder name for members known only to a secondary source.
    pub fn template() -> Self {
        Self {
            first: TEMPLATE_FIRST.to_string(),
            last: TEMPLATE_LAST.to_string(),
            last_first: format!("{}, {}", TEMPLATE_LAST, TEMPLATE_FIRST),
            preferred: TEMPLATE_FIRST.to_string(),
            preferred_full: format!("{} {}", TEMPLATE_FIRST, TEMPLATE_LAST),
        }
    }

    pub fn is_template(&self) -> bool {
        *self == Self::template()
    }

    /// Parse a single "Last, First" field. Splits on the first comma only; with no
    /// comma the whole string is the last name.
    pub fn parse_last_first(raw: &str) -> Self {
        let last_first = raw.trim().to_string();
        let (last, first) = match last_first.split_once(',') {
            Some((last, first)) => (last.trim().to_string(), first.trim().to_string()),
            None => (last_first.clone(), String::new()),
        };
        let (preferred, preferred_full) = if first.is_empty() {
            (last.clone(), last.clone())
        } else {
            (first.clone(), format!("{} {}", first, last))
        };
        Self {
            first,
            last,
            last_first,
            preferred,
            preferred_full,
        }
    }
}

/// Standing of a member, derived from status-group membership
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamStatus {
    pub title: String,
    pub current: bool,
    pub trainee: bool,
    pub mission: bool,
    pub field: bool,
}

impl TeamStatus {
    pub fn template() -> Self {
        Self {
            title: "empty".to_string(),
            ..Self::default()
        }
    }

    pub fn standing(&self) -> MemberStanding {
        if self.current {
            MemberStanding::Current
        } else if self.trainee {
            MemberStanding::Trainee
        } else {
            MemberStanding::Former
        }
    }
}

/// Which branch of the per-member policy applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStanding {
    Current,
    Trainee,
    /// Former member or never a member
    Former,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMember {
    pub name: MemberName,
    pub emails: Vec<String>,
    pub team_email: Option<String>,
    pub team_status: TeamStatus,
    #[serde(serialize_with = "serialize_group_titles")]
    pub groups: Vec<Arc<TeamGroup>>,
    pub platforms: BTreeMap<String, PlatformRecord>,
}

fn serialize_group_titles<S: Serializer>(
    groups: &[Arc<TeamGroup>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(groups.iter().map(|g| g.title.as_str()))
}

impl TeamMember {
    /// Member with template name and status, no emails, groups or platform records.
    pub fn template() -> Self {
        Self {
            name: MemberName::template(),
            emails: Vec::new(),
            team_email: None,
            team_status: TeamStatus::template(),
            groups: Vec::new(),
            platforms: BTreeMap::new(),
        }
    }

    /// Replace the email list (duplicates removed, order kept) and recompute the team email.
    pub fn set_emails(&mut self, emails: impl IntoIterator<Item = String>, domain: &str) {
        self.emails.clear();
        self.merge_emails(emails, domain);
    }

    /// Append emails not already known (case-insensitive) and recompute the team email.
    pub fn merge_emails(&mut self, emails: impl IntoIterator<Item = String>, domain: &str) {
        for email in emails {
            let email = email.trim().to_string();
            if email.is_empty() || self.has_email(&email) {
                continue;
            }
            self.emails.push(email);
        }
        self.team_email = team_email_for(&self.emails, domain);
    }

    pub fn has_email(&self, email: &str) -> bool {
        let key = email_key(email);
        self.emails.iter().any(|e| email_key(e) == key)
    }

    pub fn in_group(&self, title: &str) -> bool {
        self.groups.iter().any(|g| g.title == title)
    }

    pub fn group_titles(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.title.as_str()).collect()
    }

    pub fn platform(&self, name: &str) -> Option<&PlatformRecord> {
        self.platforms.get(name)
    }

    pub fn directory_record(&self) -> Option<&DirectoryMember> {
        self.platform(DIRECTORY).and_then(PlatformRecord::as_directory)
    }

    pub fn workspace_record(&self) -> Option<&WorkspaceUser> {
        self.platform(WORKSPACE).and_then(PlatformRecord::as_workspace)
    }

    pub fn chat_record(&self) -> Option<&ChatAccount> {
        self.platform(CHAT).and_then(PlatformRecord::as_chat)
    }

    pub fn mapping_record(&self) -> Option<&MappingUser> {
        self.platform(MAPPING).and_then(PlatformRecord::as_mapping)
    }
}

/// The single email ending with `@domain`, lower-cased.
pub fn team_email_for(emails: &[String], domain: &str) -> Option<String> {
    let suffix = format!("@{}", domain.to_lowercase());
    emails
        .iter()
        .map(|e| e.to_lowercase())
        .find(|e| e.ends_with(&suffix))
}
