//! Tooling & Integration Layer
//!
//! Command-line presentation of the team model. Everything here sits outside
//! the core and only reads the reports the builder produces.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, ReportKind};
