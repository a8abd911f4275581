//! CLI Tooling
//!
//! Command-line interface over cached source snapshots. Every command builds a
//! fresh team model and renders one view of it.

use crate::builder::{sorted_members, ModelBuilder, ReportEntry};
use crate::config::{ConfigLoader, RosterConfig};
use crate::error::RosterError;
use crate::logging::LoggingConfig;
use crate::model::{
    CheckConcern, ConcernLevel, ExpectationStatus, GroupProgress, MemberStanding, TeamMember,
    TeamModelContainer,
};
use crate::source::{SnapshotStore, SourceSet};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Rollcall CLI - Team roster reconciliation
#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Reconcile team membership across directory, workspace, chat and mapping platforms")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the cached source snapshots
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line logging flags over the configured logging section.
    /// `--verbose` raises the level to debug unless `--log-level` is given.
    pub fn apply_logging_overrides(&self, logging: &mut LoggingConfig) {
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        } else if self.verbose {
            logging.level = "debug".to_string();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Per-member account and status concerns
    Users,
    /// Group, mailing list, channel and team membership drift
    Groups,
    /// Both reports
    All,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report concerns found while reconciling sources
    Report {
        #[arg(value_enum, default_value = "all")]
        kind: ReportKind,
        /// Output format: text or json
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Show the member matching a team email or full name
    Search {
        key: String,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Show training progress for the member matching a team email or full name
    Training {
        key: String,
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// List groups and their expected qualifications
    Groups,
    /// List every member in the model
    Members {
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Report { .. } => "report",
        Commands::Search { .. } => "search",
        Commands::Training { .. } => "training",
        Commands::Groups => "groups",
        Commands::Members { .. } => "members",
    }
}

/// CLI context holding the configuration and one consistent set of snapshots
pub struct CliContext {
    config: RosterConfig,
    sources: SourceSet,
}

impl CliContext {
    /// Load configuration, then the snapshots from `cache_dir` (or the
    /// configured cache directory).
    pub fn new(config_path: Option<PathBuf>, cache_dir: Option<PathBuf>) -> Result<Self, RosterError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Self::with_config(config, cache_dir)
    }

    /// Load snapshots for an already loaded configuration.
    pub fn with_config(config: RosterConfig, cache_dir: Option<PathBuf>) -> Result<Self, RosterError> {
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => ConfigLoader::cache_dir(&config)?,
        };
        let sources = SnapshotStore::new(cache_dir).load_set(&config)?;
        Ok(Self::from_parts(config, sources))
    }

    pub fn from_parts(config: RosterConfig, sources: SourceSet) -> Self {
        Self { config, sources }
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, RosterError> {
        self.execute_at(command, Utc::now())
    }

    /// Execute a command with `now` as the reference time for training status.
    pub fn execute_at(&self, command: &Commands, now: DateTime<Utc>) -> Result<String, RosterError> {
        let started = Instant::now();
        let builder = ModelBuilder::from_sources(&self.config, &self.sources)?;
        let model = builder.build_model();

        let result = match command {
            Commands::Report { kind, format } => {
                let users = matches!(kind, ReportKind::Users | ReportKind::All)
                    .then(|| builder.user_report(&model));
                let groups = matches!(kind, ReportKind::Groups | ReportKind::All)
                    .then(|| builder.group_membership_report(&model));
                format_report(users.as_deref(), groups.as_deref(), format)
            }
            Commands::Search { key, format } => {
                let member = find_member(&model, key)?;
                format_member(member, format)
            }
            Commands::Training { key, format } => {
                let member = find_member(&model, key)?;
                let progress = builder.training_report(member, now);
                format_training(member, &progress, format)
            }
            Commands::Groups => Ok(format_groups(&model)),
            Commands::Members { format } => format_members(&model, format),
        };

        info!(
            command = command_name(command),
            agents = ?builder.agent_names(),
            members = model.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Command finished"
        );
        result
    }
}

/// Exactly one member for `key`.
fn find_member<'m>(model: &'m TeamModelContainer, key: &str) -> Result<&'m TeamMember, RosterError> {
    let found = model.search_for_member(key);
    match found.as_slice() {
        [] => Err(RosterError::MemberNotFound(key.to_string())),
        [member] => Ok(*member),
        _ => Err(RosterError::AmbiguousMember {
            key: key.to_string(),
            count: found.len(),
        }),
    }
}

fn standing_label(member: &TeamMember) -> &'static str {
    match member.team_status.standing() {
        MemberStanding::Current => "current",
        MemberStanding::Trainee => "trainee",
        MemberStanding::Former => "non-member",
    }
}

fn concern_line(concern: &CheckConcern) -> String {
    let marker = match concern.level {
        ConcernLevel::Fix => "[!] ",
        ConcernLevel::Error => "[x] ",
        ConcernLevel::Warn => "",
    };
    match &concern.platform {
        Some(platform) => format!("- {}{} {}", marker, platform, concern.concern),
        None => format!("- {}{}", marker, concern.concern),
    }
}

fn format_entries_text(entries: &[ReportEntry], output: &mut String) {
    for entry in entries {
        output.push_str(&format!(
            "\n**{}** {}\n",
            entry.member.name.preferred_full,
            entry.member.team_email.as_deref().unwrap_or("N/A")
        ));
        for concern in &entry.concerns {
            output.push_str(&concern_line(concern));
            output.push('\n');
        }
    }
}

fn format_report(
    users: Option<&[ReportEntry]>,
    groups: Option<&[ReportEntry]>,
    format: &str,
) -> Result<String, RosterError> {
    if format == "json" {
        let mut out = serde_json::Map::new();
        if let Some(users) = users {
            out.insert("users".to_string(), serde_json::to_value(users)?);
        }
        if let Some(groups) = groups {
            out.insert("groups".to_string(), serde_json::to_value(groups)?);
        }
        return Ok(serde_json::to_string_pretty(&out)?);
    }

    let users = users.unwrap_or_default();
    let groups = groups.unwrap_or_default();
    if users.is_empty() && groups.is_empty() {
        return Ok("No concerns found.".to_string());
    }
    let mut output = String::new();
    if !users.is_empty() {
        output.push_str("# Member concerns\n");
        format_entries_text(users, &mut output);
    }
    if !groups.is_empty() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str("# Group membership concerns\n");
        format_entries_text(groups, &mut output);
    }
    Ok(output.trim_end().to_string())
}

fn member_json(member: &TeamMember) -> serde_json::Value {
    json!({
        "name": member.name.preferred_full,
        "last_first": member.name.last_first,
        "team_email": member.team_email,
        "emails": member.emails,
        "status": member.team_status.title,
        "standing": standing_label(member),
        "groups": member.group_titles(),
        "platforms": member.platforms.keys().collect::<Vec<_>>(),
    })
}

fn format_member(member: &TeamMember, format: &str) -> Result<String, RosterError> {
    if format == "json" {
        return Ok(serde_json::to_string_pretty(&member_json(member))?);
    }
    let platforms: Vec<&str> = member.platforms.keys().map(String::as_str).collect();
    let mut output = format!("{}\n", member.name.preferred_full);
    output.push_str(&format!(
        "  Team email: {}\n",
        member.team_email.as_deref().unwrap_or("N/A")
    ));
    output.push_str(&format!(
        "  Status:     {} ({})\n",
        member.team_status.title,
        standing_label(member)
    ));
    output.push_str(&format!("  Emails:     {}\n", member.emails.join(", ")));
    output.push_str(&format!("  Groups:     {}\n", member.group_titles().join(", ")));
    output.push_str(&format!("  Platforms:  {}", platforms.join(", ")));
    Ok(output)
}

fn status_label(status: ExpectationStatus) -> &'static str {
    match status {
        ExpectationStatus::Met => "met",
        ExpectationStatus::Expiring => "expiring",
        ExpectationStatus::Missing => "missing",
    }
}

fn format_training(
    member: &TeamMember,
    progress: &[GroupProgress],
    format: &str,
) -> Result<String, RosterError> {
    if format == "json" {
        let out = json!({
            "member": member.name.preferred_full,
            "groups": progress,
        });
        return Ok(serde_json::to_string_pretty(&out)?);
    }
    if progress.is_empty() {
        return Ok(format!(
            "No training expectations for {}.",
            member.name.preferred_full
        ));
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Group", "Qualification", "Status", "Expires"]);
    for group in progress {
        for expectation in &group.expectations {
            let expires = expectation
                .expires_at
                .map(|e| e.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                group.group.as_str(),
                expectation.qualification.as_str(),
                status_label(expectation.status),
                expires.as_str(),
            ]);
        }
    }
    Ok(format!("Training for {}\n{}", member.name.preferred_full, table))
}

fn format_groups(model: &TeamModelContainer) -> String {
    let groups = model.all_groups();
    if groups.is_empty() {
        return "No groups found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Group", "Members", "Expectations"]);
    for group in groups {
        let members = model
            .all_members()
            .iter()
            .filter(|m| m.in_group(&group.title))
            .count();
        let expectations: Vec<&str> = group
            .expectations
            .iter()
            .map(|e| e.qualification.title.as_str())
            .collect();
        let title = if group.synthetic {
            format!("{} (derived)", group.title)
        } else {
            group.title.clone()
        };
        table.add_row(vec![title, members.to_string(), expectations.join(", ")]);
    }
    table.to_string()
}

fn format_members(model: &TeamModelContainer, format: &str) -> Result<String, RosterError> {
    let members = sorted_members(model);
    if format == "json" {
        let arr: Vec<serde_json::Value> = members.iter().map(|(_, m)| member_json(m)).collect();
        let out = json!({ "members": arr, "total": members.len() });
        return Ok(serde_json::to_string_pretty(&out)?);
    }
    if members.is_empty() {
        return Ok("No members found.".to_string());
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Name", "Team Email", "Status", "Platforms"]);
    for (_, member) in &members {
        let platforms: Vec<&str> = member.platforms.keys().map(String::as_str).collect();
        table.add_row(vec![
            member.name.last_first.clone(),
            member.team_email.clone().unwrap_or_else(|| "-".to_string()),
            member.team_status.title.clone(),
            platforms.join(", "),
        ]);
    }
    Ok(format!("{}\n\nTotal: {} member(s)", table, members.len()))
}
