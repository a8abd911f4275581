//! Linkage properties: records are only ever added, and a second pass over
//! the same records changes nothing.

use crate::integration::support::{config, directory, directory_member, mapping_user, DOMAIN};
use proptest::prelude::*;
use rollcall::agent::{DirectoryAgent, Linker, PrimaryAgent};
use rollcall::model::{MemberArena, TeamMember};
use rollcall::source::{MappingUser, MAPPING};
use std::collections::BTreeMap;

const NAMES: [&str; 4] = ["Jane Smith", "John Doe", "Amy Young", ""];
const EMAILS: [&str; 4] = [
    "jane@kcesar.org",
    "JOHN@kcesar.org",
    "amy@gmail.com",
    "john.doe@kcesar.org",
];

fn roster() -> MemberArena {
    let config = config();
    let snapshot = directory(vec![
        directory_member(1, "Smith, Jane", "jane@kcesar.org", &[1]),
        directory_member(2, "Doe, John", "john@kcesar.org", &[1]),
        directory_member(3, "Doe, John", "john.doe@kcesar.org", &[1]),
    ]);
    let agent = DirectoryAgent::new(&snapshot, &config.team, &config.directory).unwrap();
    agent.initialize_directory().1
}

fn arb_users() -> impl Strategy<Value = Vec<MappingUser>> {
    prop::collection::vec(
        (prop::option::of(0..NAMES.len()), prop::option::of(0..EMAILS.len())),
        0..10,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (name, email))| {
                mapping_user(
                    &format!("M{}", i),
                    name.map(|n| NAMES[n]),
                    email.map(|e| EMAILS[e]),
                )
            })
            .collect()
    })
}

fn link(arena: &mut MemberArena, users: &[MappingUser]) -> rollcall::agent::LinkOutcome {
    let aliases = BTreeMap::new();
    Linker::new(MAPPING, &aliases, DOMAIN).link(arena, users.iter().cloned(), |_| {
        TeamMember::template()
    })
}

proptest! {
    #[test]
    fn linking_only_adds(users in arb_users()) {
        let mut arena = roster();
        let before: Vec<_> = arena
            .members()
            .iter()
            .map(|m| (m.name.clone(), m.emails.clone(), m.directory_record().cloned()))
            .collect();

        let outcome = link(&mut arena, &users);

        prop_assert_eq!(
            outcome.attached + outcome.created + outcome.ambiguous + outcome.skipped,
            users.len()
        );
        prop_assert_eq!(arena.len(), before.len() + outcome.created);
        for (member, (name, emails, record)) in arena.members().iter().zip(&before) {
            prop_assert_eq!(&member.name, name);
            prop_assert_eq!(&member.emails, emails);
            prop_assert_eq!(member.directory_record(), record.as_ref());
        }
    }

    #[test]
    fn second_pass_is_a_no_op(users in arb_users()) {
        let mut arena = roster();
        let first = link(&mut arena, &users);
        let len = arena.len();
        let ambiguities = arena.ambiguities().len();
        let attached: Vec<_> = arena
            .members()
            .iter()
            .map(|m| m.mapping_record().map(|u| u.id.clone()))
            .collect();

        let second = link(&mut arena, &users);

        prop_assert_eq!(second.attached, 0);
        prop_assert_eq!(second.created, 0);
        prop_assert_eq!(second.skipped, first.attached + first.created);
        prop_assert_eq!(arena.len(), len);
        prop_assert_eq!(arena.ambiguities().len(), ambiguities);
        let again: Vec<_> = arena
            .members()
            .iter()
            .map(|m| m.mapping_record().map(|u| u.id.clone()))
            .collect();
        prop_assert_eq!(again, attached);
    }

    #[test]
    fn record_attaches_to_at_most_one_member(users in arb_users()) {
        let mut arena = roster();
        link(&mut arena, &users);
        for user in &users {
            let holders = arena
                .members()
                .iter()
                .filter(|m| m.mapping_record().is_some_and(|u| u.id == user.id))
                .count();
            prop_assert!(holders <= 1);
        }
    }
}
