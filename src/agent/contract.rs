//! Agent contracts.
//!
//! The builder holds exactly one [`PrimaryAgent`] and any number of
//! [`LinkageAgent`]s; both evaluate concerns through [`ConcernEvaluator`].

use crate::model::{CheckConcern, MemberArena, TeamGroup, TeamMember};
use crate::source::Award;
use std::sync::Arc;

/// Per-source policy checks. Evaluators carry no state between calls.
pub trait ConcernEvaluator {
    /// Platform name, also the member's `platforms` key for this source
    fn name(&self) -> &str;

    /// Rules about one member's standing relative to this source.
    fn member_concerns(&self, member: &TeamMember) -> Vec<CheckConcern>;

    /// Rules about whether the member's memberships on this source agree with
    /// their canonical groups.
    fn membership_concerns(&self, member: &TeamMember, groups: &[Arc<TeamGroup>])
        -> Vec<CheckConcern>;
}

/// The authoritative source: seeds groups and members from scratch.
pub trait PrimaryAgent: ConcernEvaluator {
    fn initialize_directory(&self) -> (Vec<Arc<TeamGroup>>, MemberArena);

    /// Qualification awards held by a member.
    fn awards_for_member(&self, member: &TeamMember) -> Vec<Award>;
}

/// A secondary source matched onto the roster.
pub trait LinkageAgent: ConcernEvaluator {
    /// Attach this source's records to existing members or append new ones.
    /// Never removes a member.
    fn populate_members(&self, members: &mut MemberArena);
}
