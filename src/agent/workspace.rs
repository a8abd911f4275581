//! Workspace agent: the account directory service.

use super::contract::{ConcernEvaluator, LinkageAgent};
use super::linkage::{LinkRecord, Linker};
use super::sync::{diff_containers, expected_containers, HeldContainer};
use crate::config::{TeamSettings, WorkspaceSettings};
use crate::model::{CheckConcern, ConcernList, MemberArena, MemberStanding, TeamGroup, TeamMember};
use crate::source::{PlatformRecord, WorkspaceSource, WorkspaceUser, WORKSPACE};
use crate::util::{email_key, equals_insensitive};
use std::sync::Arc;

impl LinkRecord for WorkspaceUser {
    fn record_key(&self) -> String {
        self.account_key()
    }

    fn email(&self) -> Option<&str> {
        Some(&self.primary_email)
    }

    fn full_name(&self) -> Option<&str> {
        Some(self.name.full_name.as_str()).filter(|n| !n.is_empty())
    }

    fn emails(&self) -> Vec<String> {
        std::iter::once(self.primary_email.clone())
            .chain(self.emails.iter().map(|e| e.address.clone()))
            .collect()
    }

    fn into_platform_record(self) -> PlatformRecord {
        PlatformRecord::Workspace(self)
    }
}

pub struct WorkspaceAgent<'a> {
    source: &'a dyn WorkspaceSource,
    team: &'a TeamSettings,
    settings: &'a WorkspaceSettings,
}

impl<'a> WorkspaceAgent<'a> {
    pub fn new(
        source: &'a dyn WorkspaceSource,
        team: &'a TeamSettings,
        settings: &'a WorkspaceSettings,
    ) -> Self {
        Self {
            source,
            team,
            settings,
        }
    }

    /// Accounts in a member org unit and not on the ignore list
    fn linkable(&self, user: &WorkspaceUser) -> bool {
        self.settings.org_units.contains(&user.org_unit_path)
            && !self
                .settings
                .ignore_users
                .iter()
                .any(|u| equals_insensitive(Some(u), Some(&user.primary_email)))
    }
}

impl ConcernEvaluator for WorkspaceAgent<'_> {
    fn name(&self) -> &str {
        WORKSPACE
    }

    fn member_concerns(&self, member: &TeamMember) -> Vec<CheckConcern> {
        let mut concerns = ConcernList::new(WORKSPACE);
        let user = member.workspace_record();
        match member.team_status.standing() {
            MemberStanding::Current => {
                let Some(user) = user else {
                    concerns.add(format!("Does not have a {} account", WORKSPACE));
                    return concerns.into_vec();
                };
                if user.suspended {
                    concerns.add("Has a suspended account");
                }
                match member.team_email.as_deref() {
                    Some(team_email) if team_email == user.primary_email => {}
                    Some(team_email) if equals_insensitive(Some(team_email), Some(&user.primary_email)) => {
                        concerns.warn(format!(
                            "Primary email {} differs from team email {} only by case",
                            user.primary_email, team_email
                        ));
                    }
                    team_email => concerns.add(format!(
                        "Primary email {} does not match primary team email {}",
                        user.primary_email,
                        team_email.unwrap_or("(none)")
                    )),
                }
            }
            MemberStanding::Trainee => {}
            MemberStanding::Former => {
                if let Some(user) = user.filter(|u| !u.suspended) {
                    concerns.add(format!(
                        "Has an active {} account \"{}\" ({})",
                        WORKSPACE, user.name.full_name, user.primary_email
                    ));
                }
            }
        }
        concerns.into_vec()
    }

    fn membership_concerns(
        &self,
        member: &TeamMember,
        _groups: &[Arc<TeamGroup>],
    ) -> Vec<CheckConcern> {
        let mut concerns = ConcernList::new(WORKSPACE);
        let Some(user) = member.workspace_record() else {
            return concerns.into_vec();
        };

        let synced: Vec<_> = self.settings.groups.iter().filter(|g| g.sync).collect();
        let expected = expected_containers(
            member,
            synced
                .iter()
                .map(|g| (email_key(&g.email), g.title.clone(), g.groups.as_slice())),
        );
        let held = self
            .source
            .user_memberships(&user.primary_email)
            .into_iter()
            .filter_map(|m| {
                let key = email_key(&m.group);
                synced
                    .iter()
                    .find(|g| email_key(&g.email) == key)
                    .map(|g| HeldContainer {
                        key,
                        label: g.title.clone(),
                        flag_unexpected: true,
                    })
            });

        let diff = diff_containers(expected, held);
        for title in diff.unexpected {
            concerns.add(format!("is in group {}", title));
        }
        for title in diff.missing {
            concerns.add(format!("is not in group {}", title));
        }
        concerns.into_vec()
    }
}

impl LinkageAgent for WorkspaceAgent<'_> {
    fn populate_members(&self, members: &mut MemberArena) {
        let users = self
            .source
            .all_users()
            .iter()
            .filter(|u| self.linkable(u))
            .cloned();
        Linker::new(WORKSPACE, &self.settings.alias_emails, &self.team.email_domain)
            .contribute_emails(self.settings.contribute_emails)
            .link(members, users, |_| TeamMember::template());
    }
}
