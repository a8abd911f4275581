//! Member arena: the mutable member population during one model build.
//!
//! Agents append and mutate members through stable [`MemberId`] handles. Members
//! are never removed.

use super::member::TeamMember;
use serde::Serialize;
use std::collections::HashSet;

/// Stable handle to a member inside one arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MemberId(usize);

impl MemberId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A source record that matched more than one member and was attached to none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAmbiguity {
    pub platform: String,
    pub record_key: String,
    /// Human-readable description of the record (name and/or email)
    pub record_label: String,
    pub candidates: Vec<MemberId>,
}

#[derive(Debug, Clone, Default)]
pub struct MemberArena {
    members: Vec<TeamMember>,
    ambiguities: Vec<LinkAmbiguity>,
}

impl MemberArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, member: TeamMember) -> MemberId {
        self.members.push(member);
        MemberId(self.members.len() - 1)
    }

    pub fn get(&self, id: MemberId) -> Option<&TeamMember> {
        self.members.get(id.0)
    }

    pub fn get_mut(&mut self, id: MemberId) -> Option<&mut TeamMember> {
        self.members.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MemberId, &TeamMember)> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, m)| (MemberId(i), m))
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Keys of the records already attached under `platform`.
    pub fn attached_keys(&self, platform: &str) -> HashSet<String> {
        self.members
            .iter()
            .filter_map(|m| m.platform(platform))
            .map(|r| r.record_key())
            .collect()
    }

    /// Record an ambiguous match. Re-recording the same record replaces the earlier entry.
    pub fn record_ambiguity(&mut self, ambiguity: LinkAmbiguity) {
        self.ambiguities
            .retain(|a| !(a.platform == ambiguity.platform && a.record_key == ambiguity.record_key));
        self.ambiguities.push(ambiguity);
    }

    pub fn ambiguities(&self) -> &[LinkAmbiguity] {
        &self.ambiguities
    }

    /// Ambiguities that list `id` as a candidate.
    pub fn ambiguities_for(&self, id: MemberId) -> impl Iterator<Item = &LinkAmbiguity> {
        self.ambiguities
            .iter()
            .filter(move |a| a.candidates.contains(&id))
    }
}
