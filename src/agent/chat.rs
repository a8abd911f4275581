//! Chat agent: chat accounts and channel memberships.

use super::contract::{ConcernEvaluator, LinkageAgent};
use super::linkage::{LinkRecord, Linker};
use super::sync::{diff_containers, expected_containers, HeldContainer};
use crate::config::{ChatSettings, TeamSettings};
use crate::model::{CheckConcern, ConcernList, MemberArena, MemberStanding, TeamGroup, TeamMember};
use crate::source::{ChatAccount, ChatSource, PlatformRecord, CHAT};
use crate::util::equals_insensitive;
use std::sync::Arc;

impl LinkRecord for ChatAccount {
    fn record_key(&self) -> String {
        self.user.id.clone()
    }

    fn email(&self) -> Option<&str> {
        self.user.email()
    }

    fn full_name(&self) -> Option<&str> {
        self.user.display_name()
    }

    fn into_platform_record(self) -> PlatformRecord {
        PlatformRecord::Chat(self)
    }
}

pub struct ChatAgent<'a> {
    source: &'a dyn ChatSource,
    team: &'a TeamSettings,
    settings: &'a ChatSettings,
}

impl<'a> ChatAgent<'a> {
    pub fn new(source: &'a dyn ChatSource, team: &'a TeamSettings, settings: &'a ChatSettings) -> Self {
        Self {
            source,
            team,
            settings,
        }
    }
}

impl ConcernEvaluator for ChatAgent<'_> {
    fn name(&self) -> &str {
        CHAT
    }

    fn member_concerns(&self, member: &TeamMember) -> Vec<CheckConcern> {
        let mut concerns = ConcernList::new(CHAT);
        let account = member.chat_record();
        match member.team_status.standing() {
            MemberStanding::Current => match account {
                None if self.settings.require_account => {
                    concerns.add(format!("Does not have a {} account", CHAT));
                }
                None => {}
                Some(account) => {
                    let email = account.user.email();
                    let team_email = member.team_email.as_deref();
                    if !equals_insensitive(email, team_email) {
                        concerns.add(format!(
                            "Primary email {} does not match primary team email {}",
                            email.unwrap_or("(none)"),
                            team_email.unwrap_or("(none)")
                        ));
                    } else if email != team_email {
                        concerns.warn(format!(
                            "Primary email {} differs from team email {} only by case",
                            email.unwrap_or_default(),
                            team_email.unwrap_or_default()
                        ));
                    }
                }
            },
            MemberStanding::Trainee => {}
            MemberStanding::Former => {
                if let Some(account) = account.filter(|a| !a.user.deleted) {
                    concerns.add(format!(
                        "Has an active {} account \"{}\" ({})",
                        CHAT,
                        account.user.display_name().unwrap_or(account.user.name.as_str()),
                        account.user.email().unwrap_or("no email")
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
        let mut concerns = ConcernList::new(CHAT);
        let Some(account) = member.chat_record() else {
            return concerns.into_vec();
        };

        // Only synchronized channels that exist on the platform carry expectations.
        let expected = expected_containers(
            member,
            self.settings
                .channels
                .iter()
                .filter(|c| c.sync && self.source.channel_by_name(&c.chat).is_some())
                .map(|c| (c.chat.clone(), c.chat.clone(), c.groups.as_slice())),
        );
        let held = account
            .channels
            .iter()
            .filter_map(|id| self.source.channel(id))
            .map(|channel| HeldContainer {
                key: channel.normalized_name().to_string(),
                label: channel.name.clone(),
                flag_unexpected: channel.is_private,
            });

        let diff = diff_containers(expected, held);
        for name in diff.unexpected {
            concerns.add(format!("is in private channel #{}", name));
        }
        for name in diff.missing {
            concerns.add(format!("is not in channel #{}", name));
        }
        concerns.into_vec()
    }
}

impl LinkageAgent for ChatAgent<'_> {
    fn populate_members(&self, members: &mut MemberArena) {
        let accounts = self
            .source
            .users_and_channels()
            .into_iter()
            .filter(|a| a.user.is_person());
        Linker::new(CHAT, &self.settings.alias_emails, &self.team.email_domain)
            .contribute_emails(self.settings.contribute_emails)
            .link(members, accounts, |_| TeamMember::template());
    }
}
