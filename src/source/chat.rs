//! Chat platform records: users, channels and channel memberships.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Built-in system user that is never a person
pub const SYSTEM_USER_ID: &str = "USLACKBOT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub profile: ChatProfile,
}

impl ChatUser {
    pub fn email(&self) -> Option<&str> {
        self.profile.email.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.real_name
            .as_deref()
            .or(self.profile.real_name.as_deref())
    }

    pub fn is_person(&self) -> bool {
        !self.is_bot && self.id != SYSTEM_USER_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_normalized: Option<String>,
    #[serde(default)]
    pub is_private: bool,
}

impl ChatChannel {
    pub fn normalized_name(&self) -> &str {
        self.name_normalized.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMembership {
    pub channel_id: String,
    pub user_id: String,
}

/// A chat user joined with the ids of the channels they belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatAccount {
    pub user: ChatUser,
    pub channels: Vec<String>,
}

pub trait ChatSource {
    fn users_and_channels(&self) -> Vec<ChatAccount>;
    fn channel(&self, id: &str) -> Option<&ChatChannel>;
    fn channel_by_name(&self, name: &str) -> Option<&ChatChannel>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSnapshot {
    #[serde(default)]
    pub users: Vec<ChatUser>,
    #[serde(default)]
    pub channels: Vec<ChatChannel>,
    #[serde(default)]
    pub memberships: Vec<ChatMembership>,
}

impl ChatSource for ChatSnapshot {
    fn users_and_channels(&self) -> Vec<ChatAccount> {
        let mut by_user: HashMap<&str, Vec<String>> = HashMap::new();
        for membership in &self.memberships {
            by_user
                .entry(membership.user_id.as_str())
                .or_default()
                .push(membership.channel_id.clone());
        }
        self.users
            .iter()
            .map(|user| ChatAccount {
                user: user.clone(),
                channels: by_user.remove(user.id.as_str()).unwrap_or_default(),
            })
            .collect()
    }

    fn channel(&self, id: &str) -> Option<&ChatChannel> {
        self.channels.iter().find(|c| c.id == id)
    }

    fn channel_by_name(&self, name: &str) -> Option<&ChatChannel> {
        self.channels.iter().find(|c| c.normalized_name() == name)
    }
}
