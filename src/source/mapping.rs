//! Mapping/collaboration platform records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingUser {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Team id to permission level
    #[serde(default)]
    pub groups: BTreeMap<String, u32>,
}

pub trait MappingSource {
    fn all_users(&self) -> &[MappingUser];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSnapshot {
    #[serde(default)]
    pub users: Vec<MappingUser>,
}

impl MappingSource for MappingSnapshot {
    fn all_users(&self) -> &[MappingUser] {
        &self.users
    }
}
