//! Mapping agent: collaboration-platform accounts and team memberships.

use super::contract::{ConcernEvaluator, LinkageAgent};
use super::linkage::{LinkRecord, Linker};
use crate::config::{MappingSettings, MappingTeamSetting, TeamSettings};
use crate::model::{CheckConcern, ConcernList, MemberArena, TeamGroup, TeamMember};
use crate::source::{MappingSource, MappingUser, PlatformRecord, MAPPING};
use crate::util::equals_insensitive;
use std::sync::Arc;

/// Permission required in a team when none is configured
pub const DEFAULT_MIN_PERMISSION: u32 = 10;

impl LinkRecord for MappingUser {
    fn record_key(&self) -> String {
        self.id.clone()
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    fn into_platform_record(self) -> PlatformRecord {
        PlatformRecord::Mapping(self)
    }
}

pub struct MappingAgent<'a> {
    source: &'a dyn MappingSource,
    team: &'a TeamSettings,
    settings: &'a MappingSettings,
}

impl<'a> MappingAgent<'a> {
    pub fn new(
        source: &'a dyn MappingSource,
        team: &'a TeamSettings,
        settings: &'a MappingSettings,
    ) -> Self {
        Self {
            source,
            team,
            settings,
        }
    }

    /// New members carry the mapping user's name and email.
    fn seed(&self, user: &MappingUser) -> TeamMember {
        let mut member = TeamMember::template();
        if let Some(name) = user.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            member.name.preferred_full = name.to_string();
        }
        member.set_emails(user.email.clone(), &self.team.email_domain);
        member
    }

    fn should_be_in(&self, member: &TeamMember, team: &MappingTeamSetting, email: Option<&str>) -> bool {
        team.expect_groups.iter().any(|g| member.in_group(g))
            || self
                .settings
                .extra_members
                .iter()
                .any(|extra| equals_insensitive(Some(extra), email))
    }
}

impl ConcernEvaluator for MappingAgent<'_> {
    fn name(&self) -> &str {
        MAPPING
    }

    fn member_concerns(&self, _member: &TeamMember) -> Vec<CheckConcern> {
        Vec::new()
    }

    fn membership_concerns(
        &self,
        member: &TeamMember,
        _groups: &[Arc<TeamGroup>],
    ) -> Vec<CheckConcern> {
        let mut concerns = ConcernList::new(MAPPING);
        let user = member.mapping_record();
        let email = member
            .team_email
            .as_deref()
            .or(member.emails.first().map(String::as_str))
            .or(user.and_then(|u| u.email.as_deref()));

        for team in &self.settings.teams {
            let should = self.should_be_in(member, team, email);
            let may = should
                || team.allow_external
                || (member.team_status.current && team.allow_members);
            let permission = user.and_then(|u| u.groups.get(&team.id)).copied();
            let required = team.min_permission.unwrap_or(DEFAULT_MIN_PERMISSION);

            match permission {
                None if should => {
                    concerns.add(format!("Should be in {} team \"{}\"", MAPPING, team.name))
                }
                Some(level) if should && level < required => concerns.add(format!(
                    "Permission {} in {} team \"{}\" is lower than required ({})",
                    level, MAPPING, team.name, required
                )),
                Some(_) if !may => {
                    concerns.add(format!("Should not be in {} team \"{}\"", MAPPING, team.name))
                }
                _ => {}
            }
        }
        concerns.into_vec()
    }
}

impl LinkageAgent for MappingAgent<'_> {
    fn populate_members(&self, members: &mut MemberArena) {
        let users = self.source.all_users().iter().cloned();
        Linker::new(MAPPING, &self.settings.alias_emails, &self.team.email_domain)
            .link(members, users, |user| self.seed(user));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemberName, TeamStatus};
    use crate::source::MappingSnapshot;
    use std::collections::BTreeMap;

    fn team() -> TeamSettings {
        TeamSettings {
            name: "ESAR".to_string(),
            email_domain: "kcesar.org".to_string(),
        }
    }

    fn mapping_team(allow_members: bool, allow_external: bool) -> MappingTeamSetting {
        MappingTeamSetting {
            id: "T1".to_string(),
            name: "ESAR Maps".to_string(),
            allow_members,
            allow_external,
            expect_groups: vec!["ESAR Field".to_string()],
            min_permission: None,
        }
    }

    fn user(id: &str, name: &str, email: &str, permission: Option<u32>) -> MappingUser {
        let mut groups = BTreeMap::new();
        if let Some(p) = permission {
            groups.insert("T1".to_string(), p);
        }
        MappingUser {
            id: id.to_string(),
            full_name: Some(name.to_string()),
            email: Some(email.to_string()),
            groups,
        }
    }

    fn member(current: bool, field: bool) -> TeamMember {
        let mut member = TeamMember::template();
        member.name = MemberName::parse_last_first("Smith, Jane");
        member.set_emails(vec!["jane@kcesar.org".to_string()], "kcesar.org");
        member.team_status = TeamStatus {
            title: "ESAR".to_string(),
            current,
            ..TeamStatus::default()
        };
        if field {
            member.groups = vec![Arc::new(TeamGroup {
                title: "ESAR Field".to_string(),
                expectations: Vec::new(),
                platforms: Default::default(),
                synthetic: false,
            })];
        }
        member
    }

    fn concerns_for(member: TeamMember, user: Option<MappingUser>, teams: Vec<MappingTeamSetting>) -> Vec<String> {
        let snapshot = MappingSnapshot {
            users: user.into_iter().collect(),
        };
        let team = team();
        let settings = MappingSettings {
            teams,
            ..MappingSettings::default()
        };
        let agent = MappingAgent::new(&snapshot, &team, &settings);
        let mut arena = MemberArena::new();
        arena.push(member);
        agent.populate_members(&mut arena);
        agent
            .membership_concerns(&arena.members()[0], &[])
            .into_iter()
            .map(|c| c.concern)
            .collect()
    }

    #[test]
    fn unmatched_user_seeds_name_and_email() {
        let snapshot = MappingSnapshot {
            users: vec![user("M1", "Pat Outsider", "Pat@KCESAR.org", None)],
        };
        let team = team();
        let settings = MappingSettings::default();
        let mut arena = MemberArena::new();
        MappingAgent::new(&snapshot, &team, &settings).populate_members(&mut arena);

        let seeded = &arena.members()[0];
        assert_eq!(seeded.name.preferred_full, "Pat Outsider");
        assert_eq!(seeded.name.last, "User");
        assert_eq!(seeded.team_email.as_deref(), Some("pat@kcesar.org"));
        assert!(seeded.mapping_record().is_some());
    }

    #[test]
    fn expected_member_missing_from_team() {
        let concerns = concerns_for(member(true, true), None, vec![mapping_team(true, false)]);
        assert_eq!(concerns, vec!["Should be in Mapping team \"ESAR Maps\""]);
    }

    #[test]
    fn low_permission_is_flagged() {
        let concerns = concerns_for(
            member(true, true),
            Some(user("M1", "Jane Smith", "jane@kcesar.org", Some(5))),
            vec![mapping_team(true, false)],
        );
        assert_eq!(
            concerns,
            vec!["Permission 5 in Mapping team \"ESAR Maps\" is lower than required (10)"]
        );
    }

    #[test]
    fn allowed_members_may_stay() {
        let account = || Some(user("M1", "Jane Smith", "jane@kcesar.org", Some(10)));
        assert!(concerns_for(member(true, false), account(), vec![mapping_team(true, false)]).is_empty());
        assert_eq!(
            concerns_for(member(true, false), account(), vec![mapping_team(false, false)]),
            vec!["Should not be in Mapping team \"ESAR Maps\""]
        );
        assert!(concerns_for(member(false, false), account(), vec![mapping_team(false, true)]).is_empty());
    }
}
