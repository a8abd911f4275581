//! Immutable, queryable snapshot of a built team model.

use super::arena::{LinkAmbiguity, MemberArena, MemberId};
use super::group::TeamGroup;
use super::member::TeamMember;
use crate::util::equals_insensitive;
use std::sync::Arc;

#[derive(Debug)]
pub struct TeamModelContainer {
    arena: MemberArena,
    groups: Vec<Arc<TeamGroup>>,
}

impl TeamModelContainer {
    pub fn new(arena: MemberArena, groups: Vec<Arc<TeamGroup>>) -> Self {
        Self { arena, groups }
    }

    pub fn all_members(&self) -> &[TeamMember] {
        self.arena.members()
    }

    pub fn all_groups(&self) -> &[Arc<TeamGroup>] {
        &self.groups
    }

    pub fn member(&self, id: MemberId) -> Option<&TeamMember> {
        self.arena.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MemberId, &TeamMember)> {
        self.arena.iter()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn find_group(&self, title: &str) -> Option<&Arc<TeamGroup>> {
        self.groups.iter().find(|g| g.title == title)
    }

    pub fn ambiguities(&self) -> &[LinkAmbiguity] {
        self.arena.ambiguities()
    }

    pub fn ambiguities_for(&self, id: MemberId) -> impl Iterator<Item = &LinkAmbiguity> {
        self.arena.ambiguities_for(id)
    }

    /// Every member whose team email or preferred full name equals `key`,
    /// ignoring case. Callers decide what more than one match means.
    pub fn search_for_member(&self, key: &str) -> Vec<&TeamMember> {
        self.arena
            .members()
            .iter()
            .filter(|m| {
                equals_insensitive(m.team_email.as_deref(), Some(key))
                    || equals_insensitive(Some(&m.name.preferred_full), Some(key))
            })
            .collect()
    }
}
