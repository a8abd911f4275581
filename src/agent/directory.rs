//! Directory agent: the authoritative membership source.
//!
//! Seeds every group and member. Members get their structured name, emails,
//! groups and status here and nowhere else.

use super::contract::{ConcernEvaluator, PrimaryAgent};
use crate::config::{DirectorySettings, TeamSettings};
use crate::error::RosterError;
use crate::model::{
    CheckConcern, ConcernList, GroupExpectation, MemberArena, MemberName, MemberStanding,
    Qualification, TeamGroup, TeamMember, TeamStatus,
};
use crate::source::{
    Award, DirectoryGroup, DirectoryMember, DirectorySource, PlatformRecord, QualificationRecord,
    DIRECTORY,
};
use crate::util::equals_insensitive;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

/// One join entry: optional unit designation, then a date
static JOIN_ENTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?<unit>[A-Za-z0-9]+) +)?(?<date>[\d/-]+)$")
        .expect("Invalid regex pattern for join entry")
});

pub struct DirectoryAgent<'a> {
    source: &'a dyn DirectorySource,
    team: &'a TeamSettings,
    settings: &'a DirectorySettings,
    exclude: Option<Regex>,
}

impl<'a> DirectoryAgent<'a> {
    pub fn new(
        source: &'a dyn DirectorySource,
        team: &'a TeamSettings,
        settings: &'a DirectorySettings,
    ) -> Result<Self, RosterError> {
        let exclude = settings
            .exclude_groups
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|cause| RosterError::InvalidPattern {
                setting: "directory.exclude_groups".to_string(),
                cause,
            })?;
        Ok(Self {
            source,
            team,
            settings,
            exclude,
        })
    }

    fn is_excluded(&self, group: &DirectoryGroup) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|regex| regex.is_match(&group.title))
    }

    fn build_groups(&self) -> Vec<Arc<TeamGroup>> {
        let qualifications = self.source.all_qualifications();
        let mut groups: Vec<Arc<TeamGroup>> = self
            .source
            .all_groups()
            .iter()
            .filter(|g| !self.is_excluded(g))
            .map(|g| {
                let expectations = self.resolve_expectations(&g.title, qualifications);
                Arc::new(TeamGroup::from_directory(g.clone(), expectations))
            })
            .collect();

        let operational = DirectoryGroup::operational();
        let expectations = self.resolve_expectations(&operational.title, qualifications);
        let mut synthetic = TeamGroup::from_directory(operational, expectations);
        synthetic.synthetic = true;
        groups.push(Arc::new(synthetic));
        groups
    }

    /// Configured expectations for a group, resolved against the qualification
    /// catalog. Unknown qualifications are dropped.
    fn resolve_expectations(
        &self,
        group_title: &str,
        qualifications: &[QualificationRecord],
    ) -> Vec<GroupExpectation> {
        let Some(settings) = self.settings.expectations.get(group_title) else {
            return Vec::new();
        };
        settings
            .iter()
            .filter_map(|setting| {
                let found = qualifications
                    .iter()
                    .find(|q| equals_insensitive(Some(&q.title), Some(&setting.course)));
                if found.is_none() {
                    warn!(
                        group = group_title,
                        course = %setting.course,
                        "Dropping expectation for unknown qualification"
                    );
                }
                found.map(|q| GroupExpectation {
                    qualification: Qualification {
                        title: q.title.clone(),
                    },
                    check: setting.check,
                })
            })
            .collect()
    }

    fn member_from_record(
        &self,
        record: &DirectoryMember,
        groups_by_id: &HashMap<i64, Arc<TeamGroup>>,
        known_ids: &HashSet<i64>,
    ) -> TeamMember {
        let mut member = TeamMember::template();
        member.name = MemberName::parse_last_first(&record.name);
        member.set_emails(self.record_emails(record), &self.team.email_domain);

        let mut groups: Vec<Arc<TeamGroup>> = Vec::new();
        for id in &record.group_ids {
            match groups_by_id.get(id) {
                Some(group) => groups.push(Arc::clone(group)),
                None if known_ids.contains(id) => {}
                None => warn!(member_id = record.id, group_id = id, "Unknown group id"),
            }
        }
        if record.is_operational() {
            if let Some(group) = groups_by_id.get(&DirectoryGroup::operational().id) {
                groups.push(Arc::clone(group));
            }
        }
        member.team_status = self.status_for(&groups);
        member.groups = groups;
        member
            .platforms
            .insert(DIRECTORY.to_string(), PlatformRecord::Directory(record.clone()));
        member
    }

    /// Status from every configured status group the member holds, applied in
    /// configuration order.
    fn status_for(&self, groups: &[Arc<TeamGroup>]) -> TeamStatus {
        let mut status = TeamStatus::template();
        for setting in self
            .settings
            .status_groups
            .iter()
            .filter(|s| groups.iter().any(|g| g.title == s.title))
        {
            setting.apply_to(&mut status);
        }
        status
    }

    /// Primary email plus the `;`-separated secondary email field.
    fn record_emails(&self, record: &DirectoryMember) -> Vec<String> {
        let secondary = record
            .custom_field(&self.settings.secondary_email_field)
            .unwrap_or_default()
            .split(';');
        record
            .email
            .as_deref()
            .into_iter()
            .chain(secondary)
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn check_current(&self, member: &TeamMember, concerns: &mut ConcernList) {
        let Some(record) = member.directory_record() else {
            concerns.error(format!("Current member has no {} record", DIRECTORY));
            return;
        };
        if !record.is_operational() {
            concerns.add(format!("Has unexpected status: {}", record.status.value));
        }
        if let Some(team_email) = &member.team_email {
            let on_record = self
                .record_emails(record)
                .into_iter()
                .find(|e| equals_insensitive(Some(e), Some(team_email)));
            if let Some(email) = on_record.filter(|e| e != team_email) {
                concerns.warn(format!("{} is not lowercase", email));
            }
        }
        self.check_join_date(record, concerns);

        let unit_status = record.custom_field(&self.settings.unit_status_field);
        if member.team_status.field && !unit_status.is_some_and(|s| s.contains(&self.team.name)) {
            concerns.add(format!(
                "Unit status does not include \"{}\": \"{}\"",
                self.team.name,
                unit_status.unwrap_or_default()
            ));
        }
    }

    fn check_join_date(&self, record: &DirectoryMember, concerns: &mut ConcernList) {
        let field = record
            .custom_field(&self.settings.join_date_field)
            .unwrap_or_default();
        let entries: Vec<&str> = field
            .split([';', ','])
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .collect();
        if entries.is_empty() {
            concerns.add(format!("Has no \"{}\"", self.settings.join_date_field));
            return;
        }

        let mut team_joins = 0;
        for entry in &entries {
            let Some(captures) = JOIN_ENTRY_REGEX.captures(entry) else {
                concerns.add(format!(
                    "Can't parse {} of \"{}\"",
                    self.settings.join_date_field, field
                ));
                return;
            };
            match captures.name("unit") {
                Some(unit) if unit.as_str() != self.team.name => {}
                _ => team_joins += 1,
            }
        }
        match team_joins {
            0 => concerns.add(format!(
                "Can't find {} for {}",
                self.settings.join_date_field, self.team.name
            )),
            1 => {}
            _ => concerns.add(format!(
                "Multiple {} entries. Can't identify only one as applicable to {}: \"{}\"",
                self.settings.join_date_field, self.team.name, field
            )),
        }
    }

    fn check_former(&self, member: &TeamMember, concerns: &mut ConcernList) {
        // Members known only to secondary sources have nothing to check here.
        let Some(record) = member.directory_record() else {
            return;
        };
        if record.position.contains(&self.team.name) {
            concerns.add(format!(
                "Non-member has \"{}\" in position text: {}",
                self.team.name, record.position
            ));
        }
        if let Some(status) = record.custom_field(&self.settings.unit_status_field) {
            if status.contains(&self.team.name) {
                concerns.add(format!(
                    "Non-member has \"{}\" in unit status: {}",
                    self.team.name, status
                ));
            }
        }
    }

    fn allow_listed(&self, member: &TeamMember, group_title: &str) -> bool {
        self.settings
            .add_group_members
            .get(group_title)
            .is_some_and(|emails| emails.iter().any(|e| member.has_email(e)))
    }
}

impl ConcernEvaluator for DirectoryAgent<'_> {
    fn name(&self) -> &str {
        DIRECTORY
    }

    fn member_concerns(&self, member: &TeamMember) -> Vec<CheckConcern> {
        let mut concerns = ConcernList::new(DIRECTORY);
        match member.team_status.standing() {
            MemberStanding::Current => self.check_current(member, &mut concerns),
            MemberStanding::Trainee => {}
            MemberStanding::Former => self.check_former(member, &mut concerns),
        }
        concerns.into_vec()
    }

    fn membership_concerns(
        &self,
        member: &TeamMember,
        _groups: &[Arc<TeamGroup>],
    ) -> Vec<CheckConcern> {
        let mut concerns = ConcernList::new(DIRECTORY);
        match member.team_status.standing() {
            MemberStanding::Current => {
                let mut held: Vec<&str> = Vec::new();
                for setting in &self.settings.status_groups {
                    if setting.title != self.team.name
                        && member.in_group(&setting.title)
                        && !held.contains(&setting.title.as_str())
                    {
                        held.push(&setting.title);
                    }
                }
                if held.len() > 1 {
                    concerns.add(format!(
                        "Member belongs to multiple status groups: {}",
                        held.join(", ")
                    ));
                }
            }
            MemberStanding::Trainee => {}
            MemberStanding::Former => {
                let prefix = format!("{} ", self.team.name);
                let team_groups: Vec<&str> = member
                    .groups
                    .iter()
                    .filter(|g| g.title.starts_with(&prefix) && !self.allow_listed(member, &g.title))
                    .map(|g| g.title.as_str())
                    .collect();
                if !team_groups.is_empty() {
                    concerns.add(format!(
                        "Non-member belongs to group(s) {}",
                        team_groups.join(", ")
                    ));
                }
            }
        }
        concerns.into_vec()
    }
}

impl PrimaryAgent for DirectoryAgent<'_> {
    fn initialize_directory(&self) -> (Vec<Arc<TeamGroup>>, MemberArena) {
        let groups = self.build_groups();
        let groups_by_id: HashMap<i64, Arc<TeamGroup>> = groups
            .iter()
            .filter_map(|g| g.directory_record().map(|r| (r.id, Arc::clone(g))))
            .collect();
        let known_ids: HashSet<i64> = self.source.all_groups().iter().map(|g| g.id).collect();

        let mut arena = MemberArena::new();
        for record in self.source.all_members() {
            arena.push(self.member_from_record(record, &groups_by_id, &known_ids));
        }
        debug!(
            groups = groups.len(),
            members = arena.len(),
            "Initialized directory"
        );
        (groups, arena)
    }

    fn awards_for_member(&self, member: &TeamMember) -> Vec<Award> {
        self.source.awards_for_member(member)
    }
}
