//! Account directory service records (user accounts and mailing-group memberships).

use crate::util::email_key;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceUserName {
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceEmail {
    pub address: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceUser {
    pub primary_email: String,
    #[serde(default)]
    pub name: WorkspaceUserName,
    #[serde(default)]
    pub emails: Vec<WorkspaceEmail>,
    #[serde(default)]
    pub org_unit_path: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub suspension_reason: Option<String>,
}

impl WorkspaceUser {
    /// Identity of the account: its primary email as an email key.
    pub fn account_key(&self) -> String {
        email_key(&self.primary_email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MembershipStatus {
    Active,
    Suspended,
}

/// One user's membership in one mailing group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMembership {
    /// Member email
    pub email: String,
    /// Group email
    pub group: String,
    #[serde(default)]
    pub role: String,
    pub status: MembershipStatus,
}

pub trait WorkspaceSource {
    fn all_users(&self) -> &[WorkspaceUser];
    /// Active mailing-group memberships for a user email.
    fn user_memberships(&self, email: &str) -> Vec<&WorkspaceMembership>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(default)]
    pub users: Vec<WorkspaceUser>,
    #[serde(default)]
    pub memberships: Vec<WorkspaceMembership>,
}

impl WorkspaceSource for WorkspaceSnapshot {
    fn all_users(&self) -> &[WorkspaceUser] {
        &self.users
    }

    fn user_memberships(&self, email: &str) -> Vec<&WorkspaceMembership> {
        self.memberships
            .iter()
            .filter(|m| m.status == MembershipStatus::Active && m.email.eq_ignore_ascii_case(email))
            .collect()
    }
}
