//! Record linkage shared by every secondary source.
//!
//! Each record is matched to existing members by email (alias-mapped when an alias
//! table is configured), then by normalized full name. One match attaches the
//! record; no match seeds a new member; several matches attach nowhere and are
//! recorded as an ambiguity on the arena.

use crate::model::{LinkAmbiguity, MemberArena, MemberId, TeamMember};
use crate::source::PlatformRecord;
use crate::util::{email_key, name_key};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// A source record that can be linked onto the roster
pub trait LinkRecord {
    /// Stable key, equal to `PlatformRecord::record_key` of the stored record
    fn record_key(&self) -> String;

    /// Email used for matching
    fn email(&self) -> Option<&str>;

    fn full_name(&self) -> Option<&str>;

    /// Emails contributed to a matched member when contribution is enabled
    fn emails(&self) -> Vec<String> {
        self.email().map(str::to_string).into_iter().collect()
    }

    fn into_platform_record(self) -> PlatformRecord;

    /// Human-readable description for ambiguity reports
    fn label(&self) -> String {
        match (self.full_name(), self.email()) {
            (Some(name), Some(email)) => format!("{} ({})", name, email),
            (Some(name), None) => name.to_string(),
            (None, Some(email)) => email.to_string(),
            (None, None) => self.record_key(),
        }
    }
}

/// Counts from one linkage pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOutcome {
    pub attached: usize,
    pub created: usize,
    pub ambiguous: usize,
    /// Records already attached by an earlier pass
    pub skipped: usize,
}

/// Match indexes over the members present when a pass starts
struct MatchIndex {
    by_email: HashMap<String, BTreeSet<MemberId>>,
    by_name: HashMap<String, BTreeSet<MemberId>>,
}

impl MatchIndex {
    fn build(arena: &MemberArena) -> Self {
        let mut by_email: HashMap<String, BTreeSet<MemberId>> = HashMap::new();
        let mut by_name: HashMap<String, BTreeSet<MemberId>> = HashMap::new();
        for (id, member) in arena.iter() {
            for email in &member.emails {
                by_email.entry(email_key(email)).or_default().insert(id);
            }
            if !member.name.is_template() {
                by_name
                    .entry(name_key(&member.name.preferred_full))
                    .or_default()
                    .insert(id);
            }
        }
        Self { by_email, by_name }
    }
}

/// Links one platform's records onto the member arena.
pub struct Linker<'a> {
    platform: &'a str,
    aliases: &'a BTreeMap<String, String>,
    domain: &'a str,
    contribute_emails: bool,
}

impl<'a> Linker<'a> {
    pub fn new(platform: &'a str, aliases: &'a BTreeMap<String, String>, domain: &'a str) -> Self {
        Self {
            platform,
            aliases,
            domain,
            contribute_emails: false,
        }
    }

    pub fn contribute_emails(mut self, contribute: bool) -> Self {
        self.contribute_emails = contribute;
        self
    }

    /// Email key after alias mapping; alias keys match ignoring case.
    fn match_key(&self, email: &str) -> String {
        let key = email_key(email);
        self.aliases
            .iter()
            .find(|(from, _)| email_key(from) == key)
            .map(|(_, to)| email_key(to))
            .unwrap_or(key)
    }

    fn candidates<R: LinkRecord>(&self, index: &MatchIndex, record: &R) -> Vec<MemberId> {
        let by_email = record
            .email()
            .filter(|e| !e.trim().is_empty())
            .and_then(|e| index.by_email.get(&self.match_key(e)));
        if let Some(ids) = by_email {
            return ids.iter().copied().collect();
        }
        record
            .full_name()
            .filter(|n| !n.trim().is_empty())
            .and_then(|n| index.by_name.get(&name_key(n)))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Link `records` in order. Unmatched records become members built by `seed`.
    pub fn link<R, I, F>(&self, arena: &mut MemberArena, records: I, seed: F) -> LinkOutcome
    where
        R: LinkRecord,
        I: IntoIterator<Item = R>,
        F: Fn(&R) -> TeamMember,
    {
        let index = MatchIndex::build(arena);
        let mut seen = arena.attached_keys(self.platform);
        let mut outcome = LinkOutcome::default();

        for record in records {
            let key = record.record_key();
            if seen.contains(&key) {
                outcome.skipped += 1;
                continue;
            }

            let candidates = self.candidates(&index, &record);
            if candidates.len() > 1 {
                arena.record_ambiguity(LinkAmbiguity {
                    platform: self.platform.to_string(),
                    record_key: key,
                    record_label: record.label(),
                    candidates,
                });
                outcome.ambiguous += 1;
                continue;
            }

            let target = candidates
                .first()
                .copied()
                .filter(|id| arena.get(*id).is_some_and(|m| m.platform(self.platform).is_none()));

            match target.and_then(|id| arena.get_mut(id)) {
                Some(member) => {
                    if self.contribute_emails {
                        member.merge_emails(record.emails(), self.domain);
                    }
                    member
                        .platforms
                        .insert(self.platform.to_string(), record.into_platform_record());
                    outcome.attached += 1;
                }
                None => {
                    let mut member = seed(&record);
                    member
                        .platforms
                        .insert(self.platform.to_string(), record.into_platform_record());
                    arena.push(member);
                    outcome.created += 1;
                }
            }
            seen.insert(key);
        }

        debug!(
            platform = self.platform,
            attached = outcome.attached,
            created = outcome.created,
            ambiguous = outcome.ambiguous,
            skipped = outcome.skipped,
            "Linked source records"
        );
        outcome
    }
}
