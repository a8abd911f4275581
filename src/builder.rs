//! Model Builder
//!
//! Runs the primary agent, then every linkage agent in registration order, and
//! produces the per-member concern reports.

use crate::agent::{
    ChatAgent, DirectoryAgent, LinkageAgent, MappingAgent, PrimaryAgent, WorkspaceAgent,
};
use crate::config::RosterConfig;
use crate::error::RosterError;
use crate::model::training::evaluate_expectations;
use crate::model::{
    CheckConcern, ConcernLevel, GroupProgress, MemberId, MemberStanding, TeamMember,
    TeamModelContainer,
};
use crate::source::SourceSet;
use crate::util::{compare_insensitive, equals_insensitive};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

/// One member and every concern raised against them
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub member: TeamMember,
    pub concerns: Vec<CheckConcern>,
}

pub struct ModelBuilder<'a> {
    primary: Box<dyn PrimaryAgent + 'a>,
    agents: Vec<Box<dyn LinkageAgent + 'a>>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(primary: Box<dyn PrimaryAgent + 'a>) -> Self {
        Self {
            primary,
            agents: Vec::new(),
        }
    }

    pub fn add_agent(&mut self, agent: Box<dyn LinkageAgent + 'a>) {
        self.agents.push(agent);
    }

    /// Builder over every source present in `sources`: directory, then
    /// workspace, chat and mapping.
    pub fn from_sources(config: &'a RosterConfig, sources: &'a SourceSet) -> Result<Self, RosterError> {
        let primary = DirectoryAgent::new(&sources.directory, &config.team, &config.directory)?;
        let mut builder = Self::new(Box::new(primary));
        if let Some(workspace) = &sources.workspace {
            builder.add_agent(Box::new(WorkspaceAgent::new(
                workspace,
                &config.team,
                &config.workspace,
            )));
        }
        if let Some(chat) = &sources.chat {
            builder.add_agent(Box::new(ChatAgent::new(chat, &config.team, &config.chat)));
        }
        if let Some(mapping) = &sources.mapping {
            builder.add_agent(Box::new(MappingAgent::new(
                mapping,
                &config.team,
                &config.mapping,
            )));
        }
        Ok(builder)
    }

    pub fn agent_names(&self) -> Vec<&str> {
        std::iter::once(self.primary.name())
            .chain(self.agents.iter().map(|a| a.name()))
            .collect()
    }

    pub fn build_model(&self) -> TeamModelContainer {
        let start = Instant::now();
        let (groups, mut arena) = self.primary.initialize_directory();
        for agent in &self.agents {
            agent.populate_members(&mut arena);
        }
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            members = arena.len(),
            ambiguities = arena.ambiguities().len(),
            "Built team model"
        );
        TeamModelContainer::new(arena, groups)
    }

    /// Build a fresh model and report per-member concerns.
    pub fn model_user_report(&self) -> Vec<ReportEntry> {
        self.user_report(&self.build_model())
    }

    /// Build a fresh model and report group-membership concerns.
    pub fn model_group_membership_report(&self) -> Vec<ReportEntry> {
        self.group_membership_report(&self.build_model())
    }

    pub fn user_report(&self, model: &TeamModelContainer) -> Vec<ReportEntry> {
        collect_report(model, |id, member| {
            let mut concerns = team_email_concerns(model, member);
            concerns.extend(ambiguity_concerns(model, id));
            concerns.extend(self.primary.member_concerns(member));
            for agent in &self.agents {
                concerns.extend(agent.member_concerns(member));
            }
            concerns
        })
    }

    pub fn group_membership_report(&self, model: &TeamModelContainer) -> Vec<ReportEntry> {
        let groups = model.all_groups();
        collect_report(model, |_, member| {
            let mut concerns = self.primary.membership_concerns(member, groups);
            for agent in &self.agents {
                concerns.extend(agent.membership_concerns(member, groups));
            }
            concerns
        })
    }

    /// Progress toward every expectation of the member's groups.
    pub fn training_report(&self, member: &TeamMember, now: DateTime<Utc>) -> Vec<GroupProgress> {
        let awards = self.primary.awards_for_member(member);
        evaluate_expectations(member, &awards, now)
    }
}

/// Members in report order: last name, first name, team email.
pub(crate) fn sorted_members(model: &TeamModelContainer) -> Vec<(MemberId, &TeamMember)> {
    let mut members: Vec<_> = model.iter().collect();
    members.sort_by(|(a_id, a), (b_id, b)| {
        compare_insensitive(&a.name.last, &b.name.last)
            .then_with(|| compare_insensitive(&a.name.first, &b.name.first))
            .then_with(|| {
                compare_insensitive(
                    a.team_email.as_deref().unwrap_or_default(),
                    b.team_email.as_deref().unwrap_or_default(),
                )
            })
            .then_with(|| a_id.cmp(b_id))
    });
    members
}

fn collect_report<F>(model: &TeamModelContainer, evaluate: F) -> Vec<ReportEntry>
where
    F: Fn(MemberId, &TeamMember) -> Vec<CheckConcern>,
{
    sorted_members(model)
        .into_iter()
        .filter_map(|(id, member)| {
            let concerns = evaluate(id, member);
            (!concerns.is_empty()).then(|| ReportEntry {
                member: member.clone(),
                concerns,
            })
        })
        .collect()
}

/// Cross-source team email rules owned by no single agent.
fn team_email_concerns(model: &TeamModelContainer, member: &TeamMember) -> Vec<CheckConcern> {
    let mut concerns = Vec::new();
    match (member.team_status.standing(), member.team_email.as_deref()) {
        (MemberStanding::Current, Some(team_email)) => {
            let holders: Vec<&str> = model
                .all_members()
                .iter()
                .filter(|m| m.emails.iter().any(|e| equals_insensitive(Some(e), Some(team_email))))
                .map(|m| m.name.last_first.as_str())
                .collect();
            if holders.len() > 1 {
                concerns.push(CheckConcern::unattributed(
                    format!(
                        "{} belongs to multiple members: {}",
                        team_email,
                        holders.join("; ")
                    ),
                    ConcernLevel::Fix,
                ));
            }
        }
        (MemberStanding::Current, None) => concerns.push(CheckConcern::unattributed(
            format!("{} has no team email", member.name.preferred_full),
            ConcernLevel::Fix,
        )),
        // Trainees are not evaluated.
        (MemberStanding::Trainee, _) => {}
        (MemberStanding::Former, Some(team_email)) => concerns.push(CheckConcern::unattributed(
            format!("Non-member has team email {}", team_email),
            ConcernLevel::Fix,
        )),
        (MemberStanding::Former, None) => {}
    }
    concerns
}

/// One error concern per recorded ambiguity naming every candidate.
fn ambiguity_concerns(model: &TeamModelContainer, id: MemberId) -> Vec<CheckConcern> {
    model
        .ambiguities_for(id)
        .map(|ambiguity| {
            let names: Vec<&str> = ambiguity
                .candidates
                .iter()
                .filter_map(|c| model.member(*c))
                .map(|m| m.name.last_first.as_str())
                .collect();
            CheckConcern {
                concern: format!(
                    "{} record {} matches multiple members: {}",
                    ambiguity.platform,
                    ambiguity.record_label,
                    names.join("; ")
                ),
                platform: Some(ambiguity.platform.clone()),
                level: ConcernLevel::Error,
            }
        })
        .collect()
}
