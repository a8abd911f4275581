//! Source Records
//!
//! Record shapes and read-only adapter contracts for each identity source. The
//! platform clients that fetch and refresh these records live outside this crate;
//! the core only reads already-materialized snapshots.

pub mod chat;
pub mod directory;
pub mod mapping;
pub mod snapshot;
pub mod workspace;

pub use chat::{ChatAccount, ChatChannel, ChatMembership, ChatSnapshot, ChatSource, ChatUser};
pub use directory::{
    Award, CustomField, DirectoryAward, DirectoryGroup, DirectoryMember, DirectorySnapshot,
    DirectorySource, QualificationRecord,
};
pub use mapping::{MappingSnapshot, MappingSource, MappingUser};
pub use snapshot::{SnapshotStore, SourceSet, SourceSnapshot};
pub use workspace::{
    WorkspaceMembership, WorkspaceSnapshot, WorkspaceSource, WorkspaceUser, WorkspaceUserName,
};

use serde::Serialize;

/// Platform name of the authoritative membership source
pub const DIRECTORY: &str = "Directory";
/// Platform name of the account directory service
pub const WORKSPACE: &str = "Workspace";
/// Platform name of the chat platform
pub const CHAT: &str = "Chat";
/// Platform name of the mapping/collaboration platform
pub const MAPPING: &str = "Mapping";

/// One source's raw record for a member, stored in `TeamMember::platforms`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "lowercase")]
pub enum PlatformRecord {
    Directory(DirectoryMember),
    Workspace(WorkspaceUser),
    Chat(ChatAccount),
    Mapping(MappingUser),
}

impl PlatformRecord {
    /// Stable identity of the record within its source.
    pub fn record_key(&self) -> String {
        match self {
            PlatformRecord::Directory(m) => m.id.to_string(),
            PlatformRecord::Workspace(u) => u.account_key(),
            PlatformRecord::Chat(a) => a.user.id.clone(),
            PlatformRecord::Mapping(u) => u.id.clone(),
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryMember> {
        match self {
            PlatformRecord::Directory(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_workspace(&self) -> Option<&WorkspaceUser> {
        match self {
            PlatformRecord::Workspace(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_chat(&self) -> Option<&ChatAccount> {
        match self {
            PlatformRecord::Chat(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&MappingUser> {
        match self {
            PlatformRecord::Mapping(u) => Some(u),
            _ => None,
        }
    }
}
