//! Authoritative membership source records.

use crate::model::TeamMember;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status value the membership platform uses for operational members
pub const OPERATIONAL_STATUS: &str = "Operational";

/// Group id reserved for the synthetic operational-status group
pub const OPERATIONAL_GROUP_ID: i64 = -1;

/// Title of the synthetic operational-status group
pub const OPERATIONAL_GROUP_TITLE: &str = "OPERATIONAL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryGroup {
    pub id: i64,
    pub title: String,
}

impl DirectoryGroup {
    pub fn operational() -> Self {
        Self {
            id: OPERATIONAL_GROUP_ID,
            title: OPERATIONAL_GROUP_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberStatus {
    #[serde(default, rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMember {
    pub id: i64,
    /// Display name in "Last, First" form
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub position: String,
    pub status: MemberStatus,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(default)]
    pub group_ids: Vec<i64>,
}

impl DirectoryMember {
    pub fn is_operational(&self) -> bool {
        self.status.value == OPERATIONAL_STATUS
    }

    /// Value of a custom field by label. `None` when the field or its value is absent.
    pub fn custom_field(&self, label: &str) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|f| f.label == label)
            .and_then(|f| f.value.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub expires_months_default: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardQualification {
    pub id: i64,
    pub title: String,
}

/// Award as stored in the directory snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryAward {
    pub member_id: i64,
    pub qualification: AwardQualification,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

/// Qualification award held by a canonical member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Award {
    pub qualification_title: String,
    pub completed_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&DirectoryAward> for Award {
    fn from(award: &DirectoryAward) -> Self {
        Self {
            qualification_title: award.qualification.title.clone(),
            completed_at: award.starts_at,
            expires_at: award.ends_at,
        }
    }
}

/// Read accessors over the authoritative source
pub trait DirectorySource {
    fn all_groups(&self) -> &[DirectoryGroup];
    fn all_members(&self) -> &[DirectoryMember];
    fn all_qualifications(&self) -> &[QualificationRecord];
    fn awards_for_member(&self, member: &TeamMember) -> Vec<Award>;
}

/// Cached directory data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    #[serde(default)]
    pub groups: Vec<DirectoryGroup>,
    #[serde(default)]
    pub members: Vec<DirectoryMember>,
    #[serde(default)]
    pub qualifications: Vec<QualificationRecord>,
    #[serde(default)]
    pub awards: Vec<DirectoryAward>,
}

impl DirectorySource for DirectorySnapshot {
    fn all_groups(&self) -> &[DirectoryGroup] {
        &self.groups
    }

    fn all_members(&self) -> &[DirectoryMember] {
        &self.members
    }

    fn all_qualifications(&self) -> &[QualificationRecord] {
        &self.qualifications
    }

    fn awards_for_member(&self, member: &TeamMember) -> Vec<Award> {
        let Some(record) = member.directory_record() else {
            return Vec::new();
        };
        self.awards
            .iter()
            .filter(|a| a.member_id == record.id)
            .map(Award::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_field_absent_and_empty_values() {
        let member = DirectoryMember {
            id: 1,
            name: "Smith, Jane".to_string(),
            email: None,
            position: String::new(),
            status: MemberStatus {
                kind: String::new(),
                value: OPERATIONAL_STATUS.to_string(),
            },
            custom_fields: vec![
                CustomField {
                    label: "Unit Status".to_string(),
                    value: Some("ESAR".to_string()),
                },
                CustomField {
                    label: "Secondary Email".to_string(),
                    value: None,
                },
            ],
            group_ids: vec![],
        };
        assert!(member.is_operational());
        assert_eq!(member.custom_field("Unit Status"), Some("ESAR"));
        assert_eq!(member.custom_field("Secondary Email"), None);
        assert_eq!(member.custom_field("Missing"), None);
    }

    #[test]
    fn snapshot_decodes_directory_json() {
        let json = r#"{
            "groups": [{"id": 4, "title": "ESAR Field"}],
            "members": [{
                "id": 9, "name": "Smith, Jane", "email": "jane@x.org", "position": "",
                "status": {"type": "", "value": "Operational"},
                "custom_fields": [{"label": "Unit Status", "value": "ESAR"}],
                "group_ids": [4]
            }],
            "qualifications": [{"id": 2, "title": "CPR"}],
            "awards": [{"member_id": 9, "qualification": {"id": 2, "title": "CPR"},
                        "starts_at": "2024-01-01T00:00:00Z", "ends_at": null}]
        }"#;
        let snapshot: DirectorySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.members[0].group_ids, vec![4]);
        assert_eq!(snapshot.awards[0].ends_at, None);
        assert_eq!(snapshot.qualifications[0].expires_months_default, None);
    }
}
