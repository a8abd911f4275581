//! Training progress: a member's awards evaluated against group expectations.

use super::group::ExpectationType;
use super::member::TeamMember;
use crate::source::Award;
use crate::util::equals_insensitive;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Awards expiring sooner than this are reported as expiring
pub const EXPIRY_WARNING_DAYS: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectationStatus {
    Met,
    Expiring,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectationProgress {
    pub qualification: String,
    pub status: ExpectationStatus,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupProgress {
    pub group: String,
    pub expectations: Vec<ExpectationProgress>,
}

/// Evaluate every expectation of every group the member holds. Groups without
/// expectations are skipped.
pub fn evaluate_expectations(
    member: &TeamMember,
    awards: &[Award],
    now: DateTime<Utc>,
) -> Vec<GroupProgress> {
    member
        .groups
        .iter()
        .filter(|g| !g.expectations.is_empty())
        .map(|group| GroupProgress {
            group: group.title.clone(),
            expectations: group
                .expectations
                .iter()
                .map(|e| {
                    let award = best_award(awards, &e.qualification.title);
                    let status = match e.check {
                        ExpectationType::Simple => simple_status(award, now),
                    };
                    ExpectationProgress {
                        qualification: e.qualification.title.clone(),
                        status,
                        expires_at: award.and_then(|a| a.expires_at),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Award for a qualification with the latest expiry; a non-expiring award wins.
fn best_award<'a>(awards: &'a [Award], qualification: &str) -> Option<&'a Award> {
    awards
        .iter()
        .filter(|a| equals_insensitive(Some(&a.qualification_title), Some(qualification)))
        .max_by_key(|a| (a.expires_at.is_none(), a.expires_at))
}

fn simple_status(award: Option<&Award>, now: DateTime<Utc>) -> ExpectationStatus {
    let Some(award) = award else {
        return ExpectationStatus::Missing;
    };
    match award.expires_at {
        None => ExpectationStatus::Met,
        Some(expires) if expires <= now => ExpectationStatus::Missing,
        Some(expires) if expires - now < Duration::days(EXPIRY_WARNING_DAYS) => {
            ExpectationStatus::Expiring
        }
        Some(_) => ExpectationStatus::Met,
    }
}
