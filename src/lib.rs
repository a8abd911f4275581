//! Rollcall: Team Roster Reconciliation
//!
//! Builds one canonical model of a volunteer team's members from an
//! authoritative membership directory, then links accounts from the secondary
//! platforms and reports where they disagree.

pub mod agent;
pub mod builder;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod source;
pub mod tooling;
pub mod util;
