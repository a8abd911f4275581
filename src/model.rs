//! Team Model
//!
//! Canonical member and group records produced by reconciling every identity
//! source, plus the findings ("concerns") reported against them.

pub mod arena;
pub mod concern;
pub mod container;
pub mod group;
pub mod member;
pub mod training;

pub use arena::{LinkAmbiguity, MemberArena, MemberId};
pub use concern::{CheckConcern, ConcernLevel, ConcernList};
pub use container::TeamModelContainer;
pub use group::{ExpectationType, GroupExpectation, GroupRecord, Qualification, TeamGroup};
pub use member::{MemberName, MemberStanding, TeamMember, TeamStatus};
pub use training::{ExpectationProgress, ExpectationStatus, GroupProgress};
