//! Error types for roster reconciliation.
//!
//! Only structural failures live here. Data-quality problems found while
//! reconciling sources are reported as [`crate::model::CheckConcern`] values.

use thiserror::Error;

/// Crate-level error
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid pattern in setting '{setting}': {cause}")]
    InvalidPattern {
        setting: String,
        #[source]
        cause: regex::Error,
    },

    /// An upstream source adapter could not produce data at all.
    #[error("Source '{platform}' unavailable: {reason}")]
    SourceUnavailable { platform: String, reason: String },

    #[error("No member matches '{0}'")]
    MemberNotFound(String),

    #[error("'{key}' matches {count} members")]
    AmbiguousMember { key: String, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl RosterError {
    pub fn source_unavailable(platform: &str, reason: impl Into<String>) -> Self {
        RosterError::SourceUnavailable {
            platform: platform.to_string(),
            reason: reason.into(),
        }
    }
}
