//! Concerns: structured findings raised while checking a member.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a concern, ordered from softest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcernLevel {
    /// Soft anomaly
    Warn,
    /// Drift that needs a change in some source system
    Fix,
    /// Inconsistency inside an evaluator
    Error,
}

impl fmt::Display for ConcernLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConcernLevel::Warn => "warn",
            ConcernLevel::Fix => "fix",
            ConcernLevel::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConcern {
    pub concern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub level: ConcernLevel,
}

impl CheckConcern {
    /// Concern not attributed to any single platform
    pub fn unattributed(concern: impl Into<String>, level: ConcernLevel) -> Self {
        Self {
            concern: concern.into(),
            platform: None,
            level,
        }
    }
}

/// Accumulates concerns for one platform.
#[derive(Debug, Clone)]
pub struct ConcernList {
    platform: Option<String>,
    concerns: Vec<CheckConcern>,
}

impl ConcernList {
    pub fn new(platform: &str) -> Self {
        Self {
            platform: Some(platform.to_string()),
            concerns: Vec::new(),
        }
    }

    /// Add a `fix` concern.
    pub fn add(&mut self, concern: impl Into<String>) {
        self.add_level(concern, ConcernLevel::Fix);
    }

    pub fn warn(&mut self, concern: impl Into<String>) {
        self.add_level(concern, ConcernLevel::Warn);
    }

    pub fn error(&mut self, concern: impl Into<String>) {
        self.add_level(concern, ConcernLevel::Error);
    }

    pub fn add_level(&mut self, concern: impl Into<String>, level: ConcernLevel) {
        self.concerns.push(CheckConcern {
            concern: concern.into(),
            platform: self.platform.clone(),
            level,
        });
    }

    pub fn into_vec(self) -> Vec<CheckConcern> {
        self.concerns
    }
}
