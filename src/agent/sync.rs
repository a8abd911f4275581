//! Container membership diffing for synchronized channels and mailing groups.

use crate::model::TeamMember;
use std::collections::BTreeMap;

/// A container the member currently belongs to on a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldContainer {
    /// Comparison key, matching the keys of the expected set
    pub key: String,
    pub label: String,
    /// Flag membership when the container is not expected
    pub flag_unexpected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerDiff {
    /// Labels of flagged containers the member should not be in
    pub unexpected: Vec<String>,
    /// Labels of expected containers the member is missing from
    pub missing: Vec<String>,
}

/// Containers a member is expected in: every synchronized container mapped to
/// one of the member's canonical groups. Keyed by container key, valued by label.
pub fn expected_containers<'a, I>(member: &TeamMember, containers: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String, &'a [String])>,
{
    containers
        .into_iter()
        .filter(|(_, _, groups)| groups.iter().any(|g| member.in_group(g)))
        .map(|(key, label, _)| (key, label))
        .collect()
}

/// Compare held containers with the expected set.
pub fn diff_containers(
    mut expected: BTreeMap<String, String>,
    held: impl IntoIterator<Item = HeldContainer>,
) -> ContainerDiff {
    let mut diff = ContainerDiff::default();
    for container in held {
        if expected.remove(&container.key).is_none() && container.flag_unexpected {
            diff.unexpected.push(container.label);
        }
    }
    diff.missing = expected.into_values().collect();
    diff
}
