//! Team groups and the qualifications their members are expected to hold.

use crate::source::{DirectoryGroup, DIRECTORY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualification {
    pub title: String,
}

/// How an expectation is checked. `Simple`: the member holds an unexpired award.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectationType {
    #[default]
    Simple,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupExpectation {
    pub qualification: Qualification,
    #[serde(rename = "type")]
    pub check: ExpectationType,
}

/// A source's raw record for a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "lowercase")]
pub enum GroupRecord {
    Directory(DirectoryGroup),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamGroup {
    pub title: String,
    pub expectations: Vec<GroupExpectation>,
    pub platforms: BTreeMap<String, GroupRecord>,
    /// Derived group with no upstream counterpart
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

impl TeamGroup {
    pub fn from_directory(group: DirectoryGroup, expectations: Vec<GroupExpectation>) -> Self {
        let mut platforms = BTreeMap::new();
        let title = group.title.clone();
        platforms.insert(DIRECTORY.to_string(), GroupRecord::Directory(group));
        Self {
            title,
            expectations,
            platforms,
            synthetic: false,
        }
    }

    pub fn directory_record(&self) -> Option<&DirectoryGroup> {
        match self.platforms.get(DIRECTORY) {
            Some(GroupRecord::Directory(group)) => Some(group),
            None => None,
        }
    }
}
