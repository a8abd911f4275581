//! Agents
//!
//! One agent per identity source. The directory agent seeds the roster; linkage
//! agents match their records onto it. Every agent also evaluates concerns for
//! its own source.

pub mod chat;
pub mod contract;
pub mod directory;
pub mod linkage;
pub mod mapping;
pub mod sync;
pub mod workspace;

pub use chat::ChatAgent;
pub use contract::{ConcernEvaluator, LinkageAgent, PrimaryAgent};
pub use directory::DirectoryAgent;
pub use linkage::{LinkOutcome, LinkRecord, Linker};
pub use mapping::MappingAgent;
pub use workspace::WorkspaceAgent;
